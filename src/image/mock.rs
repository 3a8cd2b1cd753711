//! Placeholder image generation for hardware-free operation.
//!
//! The placeholder is a fixed-layout SVG with the capture timestamp
//! rendered as text. Output depends only on the timestamp, so mock
//! captures are reproducible in tests.

use chrono::NaiveDateTime;

/// Placeholder canvas width in pixels.
pub const PLACEHOLDER_WIDTH: u32 = 1280;
/// Placeholder canvas height in pixels.
pub const PLACEHOLDER_HEIGHT: u32 = 720;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the placeholder image for the given timestamp.
///
/// Pure function: no I/O, no clock access. The caller supplies the
/// timestamp, which is embedded verbatim in `%Y-%m-%d %H:%M:%S` form.
pub fn render_placeholder(timestamp: NaiveDateTime) -> Vec<u8> {
    let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
    format!(
        r##"<svg width="{PLACEHOLDER_WIDTH}" height="{PLACEHOLDER_HEIGHT}" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="#2d3748"/>
  <text x="50%" y="35%" font-family="Arial" font-size="40" fill="#48bb78" text-anchor="middle">MOCK CAMERA TEST</text>
  <text x="50%" y="50%" font-family="Arial" font-size="28" fill="#e2e8f0" text-anchor="middle">{stamp}</text>
  <text x="50%" y="62%" font-family="Arial" font-size="20" fill="#a0aec0" text-anchor="middle">This simulates a USB camera capture</text>
  <text x="50%" y="70%" font-family="Arial" font-size="18" fill="#718096" text-anchor="middle">Perfect for testing before deploying to hardware</text>
  <circle cx="640" cy="500" r="80" fill="#48bb78" opacity="0.3"/>
  <circle cx="640" cy="500" r="60" fill="#48bb78" opacity="0.5"/>
  <circle cx="640" cy="500" r="40" fill="#48bb78" opacity="0.7"/>
</svg>
"##
    )
    .into_bytes()
}
