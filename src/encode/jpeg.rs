//! JPEG and PNG encoding of rendered frames plus `data:` URL helpers.

use std::path::Path;

use base64::Engine as _;

use crate::{
    foundation::error::{MemeError, MemeResult},
    render::backend::FrameRGBA,
};

/// Export quality (0.9 on a 0..1 scale).
pub const JPEG_QUALITY: u8 = 90;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Encode `frame` as a baseline JPEG, flattening alpha over black.
#[tracing::instrument(skip(frame), fields(w = frame.width, h = frame.height))]
pub fn encode_jpeg(frame: &FrameRGBA, quality: u8) -> MemeResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(MemeError::validation("jpeg quality must be in 1..=100"));
    }
    let rgb = frame.to_rgb8_over_black();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
        .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| MemeError::export(format!("encode jpeg: {e}")))?;
    Ok(out)
}

/// Write `frame` as a straight-alpha PNG for inspection.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> MemeResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| MemeError::export(format!("write png '{}': {e}", path.display())))
}

/// `data:image/jpeg;base64,...` form of `jpeg`.
pub fn to_data_url(jpeg: &[u8]) -> String {
    let mut s = String::with_capacity(DATA_URL_PREFIX.len() + jpeg.len().div_ceil(3) * 4);
    s.push_str(DATA_URL_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(jpeg, &mut s);
    s
}

/// Bytes carried by a JPEG data URL produced by [`to_data_url`].
pub fn from_data_url(url: &str) -> MemeResult<Vec<u8>> {
    let payload = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| MemeError::validation("not a base64 image/jpeg data url"))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| MemeError::validation(format!("data url payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
