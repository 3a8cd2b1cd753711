//! Uniform capture result contract.

use crate::config::CameraMode;
use serde::{Deserialize, Serialize};

/// Outcome of one capture request.
///
/// Success and failure travel through the same shape; backend errors never
/// escape as faults. The serialized field names (`image`, `error`) match
/// what existing clients of the service already parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    /// Whether an image was produced.
    pub success: bool,
    /// Inline data URL of the captured image, present on success.
    #[serde(rename = "image", skip_serializing_if = "Option::is_none", default)]
    pub image_data_url: Option<String>,
    /// Short human-readable outcome description.
    pub message: String,
    /// Which capture path produced this result.
    pub mode: CameraMode,
    /// Raw backend diagnostic, present on failure.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none", default)]
    pub error_detail: Option<String>,
}

impl CaptureResult {
    /// Builds a successful result carrying the encoded image.
    pub fn success(mode: CameraMode, image_data_url: String, message: impl Into<String>) -> Self {
        Self {
            success: true,
            image_data_url: Some(image_data_url),
            message: message.into(),
            mode,
            error_detail: None,
        }
    }

    /// Builds a failed result with an optional raw diagnostic.
    pub fn failure(
        mode: CameraMode,
        message: impl Into<String>,
        error_detail: Option<String>,
    ) -> Self {
        Self {
            success: false,
            image_data_url: None,
            message: message.into(),
            mode,
            error_detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let result = CaptureResult::success(
            CameraMode::Real,
            "data:image/jpeg;base64,AAAA".to_string(),
            "Photo captured successfully",
        );
        assert!(result.success);
        assert!(result.image_data_url.is_some());
        assert!(result.error_detail.is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let result = CaptureResult::failure(
            CameraMode::Real,
            "Camera not available",
            Some("exit status: 1".to_string()),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["mode"], "real");
        assert_eq!(json["error"], "exit status: 1");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_optional_fields_omitted() {
        let result = CaptureResult::success(
            CameraMode::Mock,
            "data:image/svg+xml;base64,AAAA".to_string(),
            "Mock photo captured successfully",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mode"], "mock");
        assert!(json.get("error").is_none());
        assert_eq!(json["image"], "data:image/svg+xml;base64,AAAA");
    }
}
