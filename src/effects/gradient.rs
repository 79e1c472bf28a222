use std::str::FromStr;

use crate::buffer::pixmap::Raster;
use crate::foundation::core::PixelFormat;
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::pipeline::request::ImageRequest;

/// Edge used for a gradient pixmap when the request leaves a dimension unset.
pub const GRADIENT_DEFAULT_EDGE: u32 = 128;

/// Marsaglia xorshf96. Seeded identically on every fill so output is reproducible.
struct Xorshf96 {
    x: u32,
    y: u32,
    z: u32,
}

impl Xorshf96 {
    const fn new() -> Self {
        Self {
            x: 123_456_789,
            y: 362_436_069,
            z: 521_288_629,
        }
    }

    fn next(&mut self) -> u32 {
        self.x ^= self.x << 16;
        self.x ^= self.x >> 5;
        self.x ^= self.x << 1;

        let t = self.x;
        self.x = self.y;
        self.y = self.z;
        self.z = t ^ self.x ^ self.y;
        self.z
    }
}

/// Fill the visible area with a vertical blend from `top` to `bottom` (RGB).
///
/// Each channel is interpolated in 8.8 fixed point per row and dithered with a
/// shared per-pixel noise byte. `BGR32` pixels are written opaque. Formats
/// other than `RGB24` and `BGR32` are left untouched.
pub fn horizontal_gradient(raster: &mut Raster, top: [u8; 3], bottom: [u8; 3]) {
    let bpp = match raster.format() {
        PixelFormat::Rgb24 => 3,
        PixelFormat::Bgr32 => 4,
        PixelFormat::I | PixelFormat::Ia => return,
    };
    let (w, h) = (raster.width() as usize, raster.height() as i64);
    let mut rng = Xorshf96::new();

    for y in 0..h {
        let base: [i64; 3] = std::array::from_fn(|c| {
            let (t, b) = (i64::from(top[c]), i64::from(bottom[c]));
            255 * t + 255 * (b - t) * y / h
        });

        let start = raster.pixel_offset(0, y as usize);
        let row = &mut raster.data_mut()[start..start + w * bpp];
        for px in row.chunks_exact_mut(bpp) {
            let d = i64::from(rng.next() & 0xff);
            for c in 0..3 {
                px[c] = ((base[c] + d) >> 8) as u8;
            }
            if bpp == 4 {
                px[3] = 255;
            }
        }
    }
}

/// Two RGB stops in the `"r,g,b:r,g,b"` notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GradientSpec {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

impl GradientSpec {
    pub fn parse(s: &str) -> PixmapResult<Self> {
        let invalid = || PixmapError::validation(format!("invalid RGB codes: {s:?}"));

        let (top, bottom) = s.split_once(':').ok_or_else(invalid)?;
        let rgb = |part: &str| -> PixmapResult<[u8; 3]> {
            let mut it = part.split(',').map(|v| v.trim().parse::<u8>());
            let mut out = [0u8; 3];
            for slot in &mut out {
                *slot = it.next().ok_or_else(invalid)?.map_err(|_| invalid())?;
            }
            if it.next().is_some() {
                return Err(invalid());
            }
            Ok(out)
        };

        Ok(Self {
            top: rgb(top)?,
            bottom: rgb(bottom)?,
        })
    }
}

impl FromStr for GradientSpec {
    type Err = PixmapError;

    fn from_str(s: &str) -> PixmapResult<Self> {
        Self::parse(s)
    }
}

/// Build a `BGR32` gradient raster sized by `req` (unset edges default to 128).
#[tracing::instrument(level = "debug", skip(req))]
pub fn gradient_pixmap(spec: GradientSpec, req: &ImageRequest) -> PixmapResult<Raster> {
    let w = req.request_width.unwrap_or(GRADIENT_DEFAULT_EDGE);
    let h = req.request_height.unwrap_or(GRADIENT_DEFAULT_EDGE);
    let mut raster = Raster::new(w, h, PixelFormat::Bgr32, req.margin)?;
    horizontal_gradient(&mut raster, spec.top, spec.bottom);
    Ok(raster)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
