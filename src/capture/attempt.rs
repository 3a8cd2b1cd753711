//! Capture attempt descriptors and per-camera tool chains.
//!
//! Each camera type maps to an ordered list of [`CaptureAttempt`]s that the
//! orchestrator walks until one succeeds. Different OS images ship different
//! camera stacks, so the CSI chain tries the modern libcamera tool first and
//! falls back to the legacy one; USB capture has a single tool and no
//! fallback.

use crate::config::{CameraConfig, CameraType, Resolution};
use std::path::Path;
use std::time::Duration;

/// Warm-up delay in milliseconds passed to CSI tools before the exposure.
///
/// Both the modern and legacy tool get the same delay so sensor warm-up is
/// consistent regardless of which one runs.
pub const DEFAULT_WARMUP_MS: u64 = 1000;

/// Bound on a single tool invocation, covering warm-up plus capture.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// One candidate invocation of an external capture tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureAttempt {
    tool: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CaptureAttempt {
    /// Creates an attempt from raw parts.
    pub fn new(tool: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            args,
            timeout,
        }
    }

    /// Executable name to spawn.
    #[inline]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Ordered argument list.
    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Wall-clock bound for the invocation.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// USB webcam capture via `fswebcam`.
    pub fn fswebcam(device: &str, resolution: Resolution, output: &Path) -> Self {
        Self::new(
            "fswebcam",
            vec![
                "--device".to_string(),
                device.to_string(),
                "-r".to_string(),
                resolution.to_string(),
                "--no-banner".to_string(),
                output.display().to_string(),
            ],
            DEFAULT_ATTEMPT_TIMEOUT,
        )
    }

    /// CSI capture via the modern libcamera stack.
    pub fn libcamera_still(resolution: Resolution, warmup_ms: u64, output: &Path) -> Self {
        Self::new(
            "libcamera-still",
            vec![
                "-o".to_string(),
                output.display().to_string(),
                "--width".to_string(),
                resolution.width().to_string(),
                "--height".to_string(),
                resolution.height().to_string(),
                "--timeout".to_string(),
                warmup_ms.to_string(),
            ],
            DEFAULT_ATTEMPT_TIMEOUT,
        )
    }

    /// CSI capture via the legacy raspistill tool for older OS images.
    pub fn raspistill(resolution: Resolution, warmup_ms: u64, output: &Path) -> Self {
        Self::new(
            "raspistill",
            vec![
                "-o".to_string(),
                output.display().to_string(),
                "-w".to_string(),
                resolution.width().to_string(),
                "-h".to_string(),
                resolution.height().to_string(),
                "-t".to_string(),
                warmup_ms.to_string(),
            ],
            DEFAULT_ATTEMPT_TIMEOUT,
        )
    }
}

/// Builds the ordered fallback chain for the configured camera type.
///
/// Every chain writes to the same `output` path; a later attempt simply
/// overwrites whatever an earlier failed attempt left behind.
pub fn attempts_for(config: &CameraConfig, output: &Path, warmup_ms: u64) -> Vec<CaptureAttempt> {
    match config.camera_type {
        CameraType::Usb => vec![CaptureAttempt::fswebcam(
            &config.device,
            config.resolution,
            output,
        )],
        CameraType::Csi => vec![
            CaptureAttempt::libcamera_still(config.resolution, warmup_ms, output),
            CaptureAttempt::raspistill(config.resolution, warmup_ms, output),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use std::path::PathBuf;

    fn output() -> PathBuf {
        PathBuf::from("/tmp/still-server/capture_1700000000000.jpg")
    }

    #[test]
    fn test_fswebcam_arguments() {
        let resolution: Resolution = "1920x1080".parse().unwrap();
        let attempt = CaptureAttempt::fswebcam("/dev/video2", resolution, &output());
        assert_eq!(attempt.tool(), "fswebcam");
        assert_eq!(
            attempt.args(),
            [
                "--device",
                "/dev/video2",
                "-r",
                "1920x1080",
                "--no-banner",
                "/tmp/still-server/capture_1700000000000.jpg",
            ]
        );
    }

    #[test]
    fn test_libcamera_still_arguments() {
        let resolution: Resolution = "1280x720".parse().unwrap();
        let attempt = CaptureAttempt::libcamera_still(resolution, 1000, &output());
        assert_eq!(attempt.tool(), "libcamera-still");
        assert_eq!(
            attempt.args(),
            [
                "-o",
                "/tmp/still-server/capture_1700000000000.jpg",
                "--width",
                "1280",
                "--height",
                "720",
                "--timeout",
                "1000",
            ]
        );
    }

    #[test]
    fn test_raspistill_arguments() {
        let resolution: Resolution = "1280x720".parse().unwrap();
        let attempt = CaptureAttempt::raspistill(resolution, 500, &output());
        assert_eq!(attempt.tool(), "raspistill");
        assert_eq!(
            attempt.args(),
            [
                "-o",
                "/tmp/still-server/capture_1700000000000.jpg",
                "-w",
                "1280",
                "-h",
                "720",
                "-t",
                "500",
            ]
        );
    }

    #[test]
    fn test_csi_chain_order() {
        let config = CameraConfig::default();
        let attempts = attempts_for(&config, &output(), DEFAULT_WARMUP_MS);
        let tools: Vec<&str> = attempts.iter().map(|a| a.tool()).collect();
        assert_eq!(tools, ["libcamera-still", "raspistill"]);
    }

    #[test]
    fn test_usb_chain_has_no_fallback() {
        let config = CameraConfig {
            camera_type: CameraType::Usb,
            ..Default::default()
        };
        let attempts = attempts_for(&config, &output(), DEFAULT_WARMUP_MS);
        let tools: Vec<&str> = attempts.iter().map(|a| a.tool()).collect();
        assert_eq!(tools, ["fswebcam"]);
    }
}
