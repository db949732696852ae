//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` locally.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};
    use std::{env, thread, time::Duration};

    use anyhow::{bail, Context};

    const DEFAULT_PORT: &str = "8000";

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        build_wasm()?;

        let port = env::var("SITE_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_owned());
        log::info!("serving static/ at http://127.0.0.1:{port}");
        for demo in shader_site::Demo::ALL {
            log::info!("  http://127.0.0.1:{port}/#{demo}");
        }

        let mut server = Command::new("python3")
            .args(["-m", "http.server", port.as_str(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start python3 http.server")?;

        loop {
            if let Some(status) = server.try_wait()? {
                bail!("http server exited with {status}");
            }
            thread::sleep(Duration::from_secs(1));
        }
    }

    fn build_wasm() -> anyhow::Result<()> {
        log::info!("building wasm package");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status();

        match status {
            Ok(st) if st.success() => Ok(()),
            Ok(st) => bail!(
                "wasm-pack finished with {st}; see https://rustwasm.github.io/wasm-pack/"
            ),
            Err(err) => {
                log::warn!("wasm-pack not runnable ({err}); serving whatever static/pkg holds");
                Ok(())
            }
        }
    }
}
