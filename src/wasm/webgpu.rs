//! WebGPU cell grid: an instanced cell shader over a Game of Life
//! simulation stepped by a compute pass.

use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;
use wgpu::util::DeviceExt;

use super::{events, render_loop};
use crate::error::{DemoError, Result};
use crate::flow::PingPong;
use crate::grid::{
    grid_uniform, workgroup_count, CellGrid, GridOptions, StepClock, CELL_VERTEX_COUNT,
    CELL_VERTICES,
};
use crate::shaders::{CELL_SHADER, CELL_SIMULATION};
use crate::viewport::Viewport;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.4,
    a: 1.0,
};

/// `navigator.gpu` is only present in browsers that ship WebGPU.
fn check_support() -> Result<()> {
    let window = web_sys::window().ok_or(DemoError::Dom("no window".into()))?;
    let navigator = window.navigator();
    let gpu = js_sys::Reflect::get(&navigator, &JsValue::from_str("gpu"))?;
    if gpu.is_undefined() || gpu.is_null() {
        return Err(DemoError::WebGpuUnsupported);
    }
    Ok(())
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

/// Adapter, device and queue for `surface`, or for offscreen work when
/// `surface` is `None`.
async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'static>>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|_| DemoError::NoAdapter)?;
    log::debug!("adapter: {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("cell grid device"),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        })
        .await
        .map_err(|err| DemoError::NoDevice(err.to_string()))?;
    Ok((adapter, device, queue))
}

fn browser_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    })
}

impl Gpu {
    async fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        check_support()?;

        let instance = browser_instance();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|err| {
                log::error!("create_surface: {err}");
                DemoError::Context("WebGPU")
            })?;
        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        // The first advertised format is the browser's preferred canvas format.
        let config = surface
            .get_default_config(&adapter, canvas.width().max(1), canvas.height().max(1))
            .ok_or(DemoError::Context("WebGPU"))?;
        surface.configure(&device, &config);
        log::debug!("canvas format: {:?}", config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.drawing_buffer();
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}

struct CellRenderer {
    gpu: Gpu,
    size: u32,
    render: wgpu::RenderPipeline,
    simulation: wgpu::ComputePipeline,
    vertices: wgpu::Buffer,
    /// Group whose binding 1 holds the current generation.
    bind_groups: PingPong<wgpu::BindGroup>,
    clock: StepClock,
}

impl CellRenderer {
    fn new(gpu: Gpu, options: GridOptions) -> Self {
        let device = &gpu.device;
        let size = options.size;

        let cell_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cell shader"),
            source: wgpu::ShaderSource::Wgsl(CELL_SHADER.into()),
        });

        let uniform = grid_buffer(device, size);
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cell vertices"),
            contents: bytemuck::cast_slice(&CELL_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let seed = CellGrid::seeded(size, options.density, js_sys::Math::random);
        log::info!("seeded {size}x{size} grid with {} live cells", seed.population());
        let states = [seed, CellGrid::empty(size)]
            .map(|grid| state_buffer(device, &grid, wgpu::BufferUsages::empty()));

        let layout = cell_layout(device);
        let bind_groups = PingPong::new(
            cell_bind_group(device, &layout, &uniform, &states[0], &states[1]),
            cell_bind_group(device, &layout, &uniform, &states[1], &states[0]),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cell pipeline layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let render = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cell pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &cell_module,
                entry_point: Some("vertexMain"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: (2 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &cell_module,
                entry_point: Some("fragmentMain"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        let simulation = simulation_pipeline(device, &pipeline_layout);

        Self {
            gpu,
            size,
            render,
            simulation,
            vertices,
            bind_groups,
            clock: StepClock::new(options.step_ms),
        }
    }

    fn frame(&mut self, now: f64, viewport: &Viewport) {
        self.gpu.resize(viewport);

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err) => {
                log::warn!("skipping frame: {err}");
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cell encoder"),
            });

        if self.clock.tick(now) {
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("cell simulation pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.simulation);
                pass.set_bind_group(0, self.bind_groups.read(), &[]);
                dispatch_generation(&mut pass, self.size);
            }
            self.bind_groups.swap();
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cell render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.render);
            pass.set_vertex_buffer(0, self.vertices.slice(..));
            pass.set_bind_group(0, self.bind_groups.read(), &[]);
            pass.draw(0..CELL_VERTEX_COUNT, 0..self.size * self.size);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn layout_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    ty: wgpu::BufferBindingType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn grid_buffer(device: &wgpu::Device, size: u32) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("grid uniform"),
        contents: bytemuck::cast_slice(&grid_uniform(size)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Storage buffer holding one generation, plus any `extra` usages.
fn state_buffer(
    device: &wgpu::Device,
    grid: &CellGrid,
    extra: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("cell state"),
        contents: bytemuck::cast_slice(grid.cells()),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | extra,
    })
}

/// Binding 0: grid uniform, 1: current generation, 2: next generation.
fn cell_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("cell bind group layout"),
        entries: &[
            layout_entry(
                0,
                wgpu::ShaderStages::VERTEX
                    | wgpu::ShaderStages::FRAGMENT
                    | wgpu::ShaderStages::COMPUTE,
                wgpu::BufferBindingType::Uniform,
            ),
            layout_entry(
                1,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::COMPUTE,
                wgpu::BufferBindingType::Storage { read_only: true },
            ),
            layout_entry(
                2,
                wgpu::ShaderStages::COMPUTE,
                wgpu::BufferBindingType::Storage { read_only: false },
            ),
        ],
    })
}

fn cell_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform: &wgpu::Buffer,
    input: &wgpu::Buffer,
    output: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cell bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: input.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: output.as_entire_binding(),
            },
        ],
    })
}

fn simulation_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
) -> wgpu::ComputePipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("cell simulation"),
        source: wgpu::ShaderSource::Wgsl(CELL_SIMULATION.into()),
    });
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("cell simulation pipeline"),
        layout: Some(layout),
        module: &module,
        entry_point: Some("computeMain"),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    })
}

fn dispatch_generation(pass: &mut wgpu::ComputePass<'_>, size: u32) {
    let groups = workgroup_count(size);
    pass.dispatch_workgroups(groups, groups, 1);
}

pub async fn start(canvas: HtmlCanvasElement, options: GridOptions) -> Result<()> {
    let viewport = events::track_viewport(&canvas)?;
    let gpu = Gpu::new(&canvas).await?;
    let mut cells = CellRenderer::new(gpu, options);

    render_loop::run(move |now| {
        let current = *viewport.borrow();
        cells.frame(now, &current);
    })?;

    log::debug!("webgpu demo running");
    Ok(())
}
