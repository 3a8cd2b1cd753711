//! Image generation and encoding.
//!
//! Covers the two ways an image leaves this service: the deterministic
//! mock placeholder for hardware-free operation, and base64 data-URL
//! encoding of whatever a capture produced.

mod encode;
mod mock;

pub use encode::{encode_file, to_data_url, EncodeError, MIME_JPEG, MIME_SVG};
pub use mock::{render_placeholder, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
