//! Still Server Library
//!
//! Photo capture service for single-board computers. A single HTTP call
//! drives an external capture tool (with a fallback chain for CSI
//! cameras), and the image comes back inline as a base64 data URL, so
//! clients on the same network need nothing but the one request. A mock
//! mode serves a deterministic placeholder for development without
//! hardware.
//!
//! # Architecture
//!
//! One capture is one pass through the orchestration state machine:
//!
//! ```text
//! config → orchestrator → {mock placeholder | tool chain → scratch file}
//!                                                   ↓
//!                                         data-URL encoding → result
//! ```
//!
//! # Design Principles
//!
//! - **Uniform results**: success and failure use the same shape; backend
//!   errors never escape as faults
//! - **Guaranteed cleanup**: every scratch file is gone before the capture
//!   returns, on every path
//! - **One capture at a time**: a single-permit lock guards the physical
//!   camera; callers queue or get a busy signal
//! - **Portable chains**: the CSI path tries the modern tool first, then
//!   the legacy one, so one build runs on old and new OS images
//!
//! # Example
//!
//! ```no_run
//! use still_server::{CameraConfig, CaptureOrchestrator, CaptureServer, ServerConfig};
//!
//! # async fn demo() -> Result<(), still_server::ServerError> {
//! let orchestrator = CaptureOrchestrator::new(CameraConfig::mock());
//! let server = CaptureServer::new(ServerConfig::default(), orchestrator);
//! server.run().await
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod image;
pub mod scratch;
pub mod server;

// Re-export commonly used types at crate root
pub use capture::{
    BackendError, CaptureAttempt, CaptureObserver, CaptureOrchestrator, CaptureResult,
    ProcessInvoker, ToolInvoker,
};
pub use config::{CameraConfig, CameraMode, CameraType, ConfigError, Resolution, ServerConfig};
pub use scratch::{ScratchStore, TempArtifact};
pub use server::{CaptureServer, ServerError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
