//! Image encoding: rendered RGBA surface → PNG data URL.
//!
//! The annotation surface must not assume file-system access, so each page
//! travels as a self-contained `data:image/png;base64,…` URL. PNG keeps the
//! rendered text crisp; JPEG artefacts around glyph edges are very visible
//! once the canvas is zoomed in.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// MIME type of every encoded page.
pub const PNG_MIME: &str = "image/png";

/// Encode a rendered page as a base64 PNG data URL.
pub fn encode_data_url(img: &RgbaImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!(
        "Encoded {}x{} page → {} bytes base64",
        img.width(),
        img.height(),
        b64.len()
    );

    Ok(format!("data:{PNG_MIME};base64,{b64}"))
}

/// Split a base64 data URL into its MIME type and decoded payload.
pub fn decode_data_url(url: &str) -> Option<(&str, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime, bytes))
}
