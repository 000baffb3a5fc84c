use std::sync::Arc;

use crate::foundation::error::{MemeError, MemeResult};

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Pixels are shared behind an [`Arc`], so cloning is cheap and never copies the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap already premultiplied RGBA8 pixels, checking the buffer length.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> MemeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MemeError::image_load("image has a zero dimension"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(MemeError::image_load("image byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode encoded image bytes (any format `image` understands) to premultiplied RGBA8.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> MemeResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MemeError::image_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    DecodedImage::from_premul_rgba8(width, height, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
