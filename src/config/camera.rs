//! Camera configuration resolved from the process environment.
//!
//! All values carry documented defaults so the service starts on a bare
//! system, and every value is parsed into a typed field before the first
//! capture. Malformed values are rejected at startup rather than guessed at
//! per request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable selecting mock mode (`"true"` enables it).
pub const ENV_MOCK_MODE: &str = "MOCK_MODE";
/// Environment variable selecting the camera type (`csi` or `usb`).
pub const ENV_CAMERA_TYPE: &str = "CAMERA_TYPE";
/// Environment variable naming the USB video device node.
pub const ENV_USB_CAMERA_DEVICE: &str = "USB_CAMERA_DEVICE";
/// Environment variable holding the capture resolution as `<width>x<height>`.
pub const ENV_CAMERA_RESOLUTION: &str = "CAMERA_RESOLUTION";

const DEFAULT_DEVICE: &str = "/dev/video0";
const DEFAULT_RESOLUTION: Resolution = Resolution {
    width: 1920,
    height: 1080,
};

/// Configuration validation errors. Fatal at startup, never per-request.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid resolution {0:?} (expected <width>x<height> with positive integers)")]
    InvalidResolution(String),
    #[error("unknown camera type {0:?} (expected csi or usb)")]
    UnknownCameraType(String),
    #[error("invalid port {0:?} (expected 1-65535)")]
    InvalidPort(String),
}

/// Whether captures run against real hardware or the mock generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Hardware-free placeholder captures for development and testing.
    Mock,
    /// Captures through an external camera tool.
    Real,
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraMode::Mock => write!(f, "mock"),
            CameraMode::Real => write!(f, "real"),
        }
    }
}

/// Physical camera attachment kind, which selects the capture tool chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraType {
    /// Ribbon-connected camera module driven by the libcamera/raspistill stack.
    Csi,
    /// Generic webcam exposed as a video device node, driven by fswebcam.
    Usb,
}

impl FromStr for CameraType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("csi") {
            Ok(CameraType::Csi)
        } else if s.eq_ignore_ascii_case("usb") {
            Ok(CameraType::Usb)
        } else {
            Err(ConfigError::UnknownCameraType(s.to_string()))
        }
    }
}

impl fmt::Display for CameraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraType::Csi => write!(f, "csi"),
            CameraType::Usb => write!(f, "usb"),
        }
    }
}

/// Capture resolution in pixels, always positive in both dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Creates a resolution from raw dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResolution(format!(
                "{width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidResolution(s.to_string());
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        Resolution::new(width, height).map_err(|_| invalid())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Immutable camera configuration, constructed once at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Capture mode (mock or real).
    pub mode: CameraMode,
    /// Attached camera kind, selecting the tool chain.
    pub camera_type: CameraType,
    /// Video device node, used only for USB captures.
    pub device: String,
    /// Capture resolution.
    pub resolution: Resolution,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Real,
            camera_type: CameraType::Csi,
            device: DEFAULT_DEVICE.to_string(),
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl CameraConfig {
    /// Creates a mock-mode configuration, useful for tests and demos.
    pub fn mock() -> Self {
        Self {
            mode: CameraMode::Mock,
            ..Default::default()
        }
    }

    /// Resolves the configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults; set-but-malformed
    /// variables are a [`ConfigError`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary string lookup.
    ///
    /// The lookup receives the environment variable name and returns the
    /// raw value, if any. Tests use this to avoid touching the real
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mode = match lookup(ENV_MOCK_MODE) {
            Some(value) if value.eq_ignore_ascii_case("true") => CameraMode::Mock,
            _ => CameraMode::Real,
        };
        let camera_type = match lookup(ENV_CAMERA_TYPE) {
            Some(value) => value.parse()?,
            None => CameraType::Csi,
        };
        let device = lookup(ENV_USB_CAMERA_DEVICE).unwrap_or_else(|| DEFAULT_DEVICE.to_string());
        let resolution = match lookup(ENV_CAMERA_RESOLUTION) {
            Some(value) => value.parse()?,
            None => DEFAULT_RESOLUTION,
        };
        Ok(Self {
            mode,
            camera_type,
            device,
            resolution,
        })
    }
}
