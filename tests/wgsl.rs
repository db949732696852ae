#![cfg(not(target_arch = "wasm32"))]

use naga::valid::{Capabilities, ValidationFlags, Validator};
use shader_site::grid::WORKGROUP_SIZE;
use shader_site::shaders::{CELL_SHADER, CELL_SIMULATION};

fn validated(source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|err| panic!("{}", err.emit_to_string(source)));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|err| panic!("{}", err.emit_to_string(source)));
    module
}

fn entry<'a>(module: &'a naga::Module, name: &str) -> &'a naga::EntryPoint {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name)
        .unwrap_or_else(|| panic!("missing entry point {name}"))
}

#[test]
fn cell_shader_has_vertex_and_fragment_entries() {
    let module = validated(CELL_SHADER);
    assert_eq!(entry(&module, "vertexMain").stage, naga::ShaderStage::Vertex);
    assert_eq!(entry(&module, "fragmentMain").stage, naga::ShaderStage::Fragment);
}

#[test]
fn simulation_workgroup_matches_dispatch_math() {
    let module = validated(CELL_SIMULATION);
    let main = entry(&module, "computeMain");
    assert_eq!(main.stage, naga::ShaderStage::Compute);
    assert_eq!(main.workgroup_size, [WORKGROUP_SIZE, WORKGROUP_SIZE, 1]);
}
