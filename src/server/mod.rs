//! HTTP service surface.
//!
//! Thin shell over the capture core: routing, CORS, and status mapping.
//! Nothing in here makes capture decisions.

mod http;

pub use http::{CaptureServer, ServerError};
