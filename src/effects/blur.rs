use crate::buffer::pixmap::Raster;
use crate::effects::composite::over;
use crate::foundation::core::PixelFormat;
use crate::foundation::error::PixmapResult;
use crate::foundation::math::{checked_area, try_alloc};

/// Summed-area table over `Z` interleaved channels.
///
/// Row `r`, column `c` holds the per-channel sum of every sample above and to
/// the left of pixel `(c - 1, r - 1)`; row 0 and column 0 are zero. Sums wrap
/// modulo 2^32, box differences stay exact.
struct IntegralImage<const Z: usize> {
    stride: usize,
    cells: Vec<u32>,
}

impl<const Z: usize> IntegralImage<Z> {
    fn build(
        width: usize,
        height: usize,
        mut sample: impl FnMut(usize, usize) -> [u8; Z],
    ) -> PixmapResult<Self> {
        let stride = checked_area(width + 1, Z)?;
        let mut cells = try_alloc::<u32>(checked_area(stride, height + 1)?)?;

        for y in 0..height {
            let (above, rest) = cells.split_at_mut((y + 1) * stride);
            let above = &above[y * stride..];
            let cur = &mut rest[..stride];

            let mut run = [0u32; Z];
            for x in 0..width {
                let px = sample(x, y);
                let at = (x + 1) * Z;
                for c in 0..Z {
                    run[c] = run[c].wrapping_add(u32::from(px[c]));
                    cur[at + c] = above[at + c].wrapping_add(run[c]);
                }
            }
        }

        Ok(Self { stride, cells })
    }

    fn row(&self, r: usize) -> &[u32] {
        &self.cells[r * self.stride..(r + 1) * self.stride]
    }
}

/// Window of the box around one output coordinate, as integral-image indices.
#[derive(Clone, Copy, Debug)]
struct Span {
    lo: usize,
    hi: usize,
}

impl Span {
    /// `[max(0, at - radius), min(len - 1, at + radius)]`, shifted to table indices.
    fn around(at: usize, radius: usize, len: usize) -> Self {
        Self {
            lo: at.saturating_sub(radius),
            hi: (at + radius).min(len - 1) + 1,
        }
    }
}

fn box_sum<const Z: usize>(top: &[u32], bottom: &[u32], cols: Span) -> [u32; Z] {
    let (lo, hi) = (cols.lo * Z, cols.hi * Z);
    std::array::from_fn(|c| {
        bottom[hi + c]
            .wrapping_sub(bottom[lo + c])
            .wrapping_sub(top[hi + c])
            .wrapping_add(top[lo + c])
    })
}

/// `65536 / box area`. The divisor stays fixed where the window is truncated by
/// an image edge, so edge pixels come out darker than a true average.
fn box_multiplier(boxw: usize, boxh: usize) -> u32 {
    let area = (2 * boxw as u64 + 1) * (2 * boxh as u64 + 1);
    (65536 / area) as u32
}

#[inline]
fn scale(sum: u32, m: u32) -> u8 {
    ((u64::from(sum) * u64::from(m)) >> 16).min(255) as u8
}

/// Approximate box blur of every channel, in place, over the full buffer.
///
/// Only `IA` (2 channels) and `BGR32` (4 channels) are blurred; other formats
/// are left untouched without allocating.
pub fn box_blur(raster: &mut Raster, boxw: u32, boxh: u32) -> PixmapResult<()> {
    match raster.format() {
        PixelFormat::Ia => blur_channels::<2>(raster, boxw, boxh),
        PixelFormat::Bgr32 => blur_channels::<4>(raster, boxw, boxh),
        PixelFormat::I | PixelFormat::Rgb24 => Ok(()),
    }
}

fn blur_channels<const Z: usize>(raster: &mut Raster, boxw: u32, boxh: u32) -> PixmapResult<()> {
    let (w, h) = (raster.full_width(), raster.full_height());
    if w == 0 || h == 0 {
        return Ok(());
    }
    let boxw = (boxw as usize).min(w);
    let boxh = boxh as usize;
    let ls = raster.linesize();

    let table = {
        let data = raster.data();
        IntegralImage::<Z>::build(w, h, |x, y| {
            let o = y * ls + x * Z;
            std::array::from_fn(|c| data[o + c])
        })?
    };

    let m = box_multiplier(boxw, boxh);
    for y in 0..h {
        let rows = Span::around(y, boxh, h);
        let (top, bottom) = (table.row(rows.lo), table.row(rows.hi));
        let dst = raster.row_mut(y);
        for x in 0..w {
            let sums = box_sum::<Z>(top, bottom, Span::around(x, boxw, w));
            for c in 0..Z {
                dst[x * Z + c] = scale(sums[c], m);
            }
        }
    }
    Ok(())
}

/// Soft black shadow under the existing pixels, in place.
///
/// The alpha channel is box blurred, displaced by `(boxw, boxh)` towards the
/// bottom right, and each existing pixel is laid "over" its shadow. Formats
/// without alpha are left untouched and no scratch table is allocated.
pub fn drop_shadow(raster: &mut Raster, boxw: u32, boxh: u32) -> PixmapResult<()> {
    match raster.format() {
        PixelFormat::Bgr32 => shadow_channels::<3>(raster, boxw, boxh),
        PixelFormat::Ia => shadow_channels::<1>(raster, boxw, boxh),
        PixelFormat::I | PixelFormat::Rgb24 => Ok(()),
    }
}

/// `C` colour channels followed by one alpha byte per pixel.
fn shadow_channels<const C: usize>(raster: &mut Raster, boxw: u32, boxh: u32) -> PixmapResult<()> {
    let (w, h) = (raster.full_width(), raster.full_height());
    if w == 0 || h == 0 {
        return Ok(());
    }
    let boxw = (boxw as usize).min(w);
    let boxh = boxh as usize;
    let ls = raster.linesize();
    let bpp = C + 1;

    let table = {
        let data = raster.data();
        IntegralImage::<1>::build(w, h, |x, y| {
            if x < boxw || y < boxh {
                return [0];
            }
            [data[(y - boxh) * ls + (x - boxw) * bpp + C]]
        })?
    };

    let m = box_multiplier(boxw, boxh);
    for y in 0..h {
        let rows = Span::around(y, boxh, h);
        let (top, bottom) = (table.row(rows.lo), table.row(rows.hi));
        let dst = raster.row_mut(y);
        for x in 0..w {
            let [sum] = box_sum::<1>(top, bottom, Span::around(x, boxw, w));
            let shadow = scale(sum, m);

            let px = &mut dst[x * bpp..(x + 1) * bpp];
            let color: [u8; C] = std::array::from_fn(|c| px[c]);
            let (out, a) = over(color, px[C], [0; C], shadow);
            px[..C].copy_from_slice(&out);
            px[C] = a;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
