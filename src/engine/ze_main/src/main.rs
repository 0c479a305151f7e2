use std::path::Path;
use ze_core::logger::StdoutSink;
use ze_core::{logger, thread, ze_error};

mod camera;
mod color_shader;
mod config;
mod graphics;
mod model;
mod system;

use config::{EngineConfig, CONFIG_FILE};

#[cfg(windows)]
fn run(config: EngineConfig) {
    use ze_d3d11_backend::{D3D11Backend, DriverType};
    use ze_d3d11_shader_compiler::D3D11ShaderCompiler;
    use ze_windows_platform::WindowsPlatform;

    let platform = match WindowsPlatform::new() {
        Ok(platform) => platform,
        Err(error) => {
            ze_error!("Failed to create the platform: {}", error);
            return;
        }
    };

    let driver_type = match config.driver_type {
        config::DriverType::Hardware => DriverType::Hardware,
        config::DriverType::Reference => DriverType::Reference,
        config::DriverType::Warp => DriverType::Warp,
    };
    let backend = match D3D11Backend::new(driver_type) {
        Ok(backend) => backend,
        Err(error) => {
            ze_error!("Failed to create the Direct3D 11 backend: {}", error);
            return;
        }
    };
    let compiler = D3D11ShaderCompiler::new();

    let mut system = system::System::new(platform.as_ref(), &backend, &compiler, config);
    match system.initialize() {
        Ok(()) => system.run(),
        Err(error) => ze_error!("Failed to initialize: {}", error),
    }
    system.shutdown();
}

#[cfg(not(windows))]
fn run(_: EngineConfig) {
    ze_error!("Unsupported platform, only Windows has a Direct3D 11 backend");
}

fn main() {
    thread::set_thread_name(std::thread::current().id(), "Main Thread".to_string());
    logger::register_sink(Box::new(StdoutSink::new()));

    let config = match EngineConfig::load(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(error) => {
            ze_error!("{}, using the default configuration", error);
            EngineConfig::default()
        }
    };

    run(config);
}
