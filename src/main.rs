//! Still Server
//!
//! Capture service binary: resolves configuration from the environment,
//! builds the orchestrator, and serves capture and health endpoints
//! until ctrl-c.

use still_server::{CameraConfig, CameraType, CaptureOrchestrator, CaptureServer, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Still Server v{}", still_server::VERSION);

    let camera = match CameraConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid camera configuration: {}", e);
            std::process::exit(1);
        }
    };
    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid server configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Mode: {}", camera.mode);
    info!("Camera type: {}", camera.camera_type);
    if camera.camera_type == CameraType::Usb {
        info!("USB device: {}", camera.device);
    }
    info!("Resolution: {}", camera.resolution);

    let orchestrator = CaptureOrchestrator::new(camera);
    let server = CaptureServer::new(server_config, orchestrator);

    if let Err(e) = server.run().await {
        eprintln!("Server failed: {}", e);
        std::process::exit(1);
    }
}
