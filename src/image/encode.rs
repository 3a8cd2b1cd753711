//! Data-URL encoding of captured images.
//!
//! Results carry the image inline as `data:<mime>;base64,<payload>`, so the
//! client needs no second fetch and the server keeps no image files around.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// MIME type for JPEG captures from real cameras.
pub const MIME_JPEG: &str = "image/jpeg";
/// MIME type for the SVG placeholder used in mock mode.
pub const MIME_SVG: &str = "image/svg+xml";

/// Errors turning a captured image into a data URL.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("image buffer is empty")]
    EmptyImage,
    #[error("failed to read captured image {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("captured image {path:?} is empty")]
    EmptyFile { path: PathBuf },
}

/// Encodes an in-memory image as a data URL with the given MIME type.
///
/// Rejects empty buffers; a capture that produced zero bytes is a failed
/// capture, not an encodable image.
pub fn to_data_url(bytes: &[u8], mime: &str) -> Result<String, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::EmptyImage);
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Reads an image file and encodes it as a data URL.
///
/// A missing or empty file is an error: capture tools report success
/// before the orchestrator knows whether they actually wrote anything.
pub async fn encode_file(path: &Path, mime: &str) -> Result<String, EncodeError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| EncodeError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(EncodeError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    to_data_url(&bytes, mime)
}
