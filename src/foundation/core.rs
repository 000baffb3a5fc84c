use crate::foundation::error::{MemeError, MemeResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Canvas `target_width` pixels wide that keeps the `src_width:src_height` aspect ratio.
    ///
    /// The height is `target_width * src_height / src_width` truncated toward zero, the way an
    /// HTML canvas truncates a fractional dimension, and never less than one pixel.
    pub fn fit_width(src_width: u32, src_height: u32, target_width: u32) -> MemeResult<Self> {
        if src_width == 0 || src_height == 0 {
            return Err(MemeError::validation(
                "source image dimensions must be > 0",
            ));
        }
        if target_width == 0 {
            return Err(MemeError::validation("target width must be > 0"));
        }

        let height = u64::from(target_width) * u64::from(src_height) / u64::from(src_width);
        let height = u32::try_from(height.max(1))
            .map_err(|_| MemeError::validation("output height overflows u32"))?;

        Ok(Self {
            width: target_width,
            height,
        })
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
