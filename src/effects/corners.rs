use crate::buffer::pixmap::Raster;
use crate::foundation::core::{Corners, PixelFormat};
use crate::foundation::error::PixmapResult;

const BGR32_BPP: usize = 4;
const ALPHA: usize = 3;

/// Cut antialiased rounded corners into the visible area of `raster`.
///
/// `RGB24` input is first expanded to `BGR32` (opaque). A zero radius, or any
/// other pixel format, hands the raster back unchanged. The radius is clamped
/// to half the visible height and half the visible width.
#[tracing::instrument(level = "trace", skip(raster), fields(w = raster.width(), h = raster.height()))]
pub fn rounded_corners(raster: Raster, radius: u32, corners: Corners) -> PixmapResult<Raster> {
    if radius == 0 {
        return Ok(raster);
    }
    let mut raster = match raster.format() {
        PixelFormat::Bgr32 => raster,
        PixelFormat::Rgb24 => rgb24_to_bgr32(&raster)?,
        PixelFormat::I | PixelFormat::Ia => return Ok(raster),
    };

    let (w, h) = (raster.width() as usize, raster.height() as usize);
    let r = (radius as usize).min(h / 2).min(w / 2);
    let r2 = (r * r) as f32;

    let left = |top| if top { Corners::TOP_LEFT } else { Corners::BOTTOM_LEFT };
    let right = |top| if top { Corners::TOP_RIGHT } else { Corners::BOTTOM_RIGHT };

    for i in 0..r {
        let x = r as f32 - (r2 - (i * i) as f32).sqrt();
        let run = CornerRun {
            len: x as usize,
            alpha: (255.0 - x.fract() * 255.0) as u8,
        };
        let y = r - i - 1;

        for (row, top) in [(y, true), (h - 1 - y, false)] {
            let start = raster.pixel_offset(0, row);
            let px = &mut raster.data_mut()[start..start + w * BGR32_BPP];
            if corners.contains(left(top)) {
                run.cut_left(px);
            }
            if corners.contains(right(top)) {
                run.cut_right(px);
            }
        }
    }
    Ok(raster)
}

/// Transparent run on one scan row plus the antialiased pixel that ends it.
#[derive(Clone, Copy, Debug)]
struct CornerRun {
    len: usize,
    alpha: u8,
}

impl CornerRun {
    fn cut_left(self, row: &mut [u8]) {
        row[..self.len * BGR32_BPP].fill(0);
        row[self.len * BGR32_BPP + ALPHA] = self.alpha;
    }

    fn cut_right(self, row: &mut [u8]) {
        let w = row.len() / BGR32_BPP;
        row[(w - self.len) * BGR32_BPP..].fill(0);
        row[(w - self.len - 1) * BGR32_BPP + ALPHA] = self.alpha;
    }
}

/// Lossless `RGB24` to `BGR32` expansion with opaque alpha. Dimensions, margin
/// and metadata carry over; margin pixels become opaque too.
pub fn rgb24_to_bgr32(src: &Raster) -> PixmapResult<Raster> {
    let mut dst = Raster::new(src.width(), src.height(), PixelFormat::Bgr32, src.margin())?;
    dst.set_aspect(src.aspect());
    dst.set_orientation(src.orientation());
    dst.insert_flags(src.flags());

    let w = src.full_width();
    for y in 0..src.full_height() {
        let s = &src.row(y)[..w * 3];
        let d = &mut dst.row_mut(y)[..w * BGR32_BPP];
        for (d, s) in d.chunks_exact_mut(BGR32_BPP).zip(s.chunks_exact(3)) {
            d.copy_from_slice(&[s[0], s[1], s[2], 255]);
        }
    }
    Ok(dst)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/corners.rs"]
mod tests;
