//! Service configuration.
//!
//! Configuration is resolved once from the process environment at startup
//! into immutable typed values. There is no ambient global state; the
//! resolved structs are passed into the components that need them.

mod camera;
mod server;

pub use camera::{
    CameraConfig, CameraMode, CameraType, ConfigError, Resolution, ENV_CAMERA_RESOLUTION,
    ENV_CAMERA_TYPE, ENV_MOCK_MODE, ENV_USB_CAMERA_DEVICE,
};
pub use server::{ServerConfig, DEFAULT_PORT, ENV_PORT};
