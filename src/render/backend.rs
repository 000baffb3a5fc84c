/// A rendered composite as RGBA8 pixels.
///
/// Frames produced by the CPU backend are **premultiplied alpha**; the flag makes that explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 pixel at `(x, y)`, as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha RGBA8 copy, suitable for PNG output.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// RGB8 copy composited over opaque black, the way a canvas flattens alpha for JPEG.
    pub fn to_rgb8_over_black(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            if self.premultiplied {
                out.extend_from_slice(&px[..3]);
            } else {
                let a = px[3] as u16;
                for &c in &px[..3] {
                    out.push(((c as u16 * a + 127) / 255) as u8);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
