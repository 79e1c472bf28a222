use crate::buffer::pixmap::Raster;
use crate::foundation::core::{PixelFormat, Rgba8};
use crate::foundation::math::div255;

/// Porter-Duff "over" of a straight-alpha source pixel onto a straight-alpha
/// destination pixel. Returns the blended colour channels and the new alpha.
pub fn over<const C: usize>(src: [u8; C], sa: u8, dst: [u8; C], da: u8) -> ([u8; C], u8) {
    let sa = u32::from(sa);
    let fa = sa + div255((255 - sa) * u32::from(da));
    if fa == 0 {
        return ([0; C], 0);
    }

    let sa = if fa == 255 { sa } else { sa * 255 / fa };
    let da = 255 - sa;
    let out = std::array::from_fn(|i| {
        div255(u32::from(src[i]) * sa + u32::from(dst[i]) * da) as u8
    });
    (out, fa as u8)
}

/// Effective source alpha of a mask pixel under constant alpha `a`.
#[inline]
fn coverage_alpha(coverage: u8, a: u8) -> u8 {
    div255(u32::from(coverage) * u32::from(a)) as u8
}

/// Row kernels for the supported (mask, destination) format pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CompositeKernel {
    MaskOnIa,
    /// Constant alpha 255: full coverage writes the colour directly.
    MaskOnIaOpaque,
    MaskOnBgr32,
}

impl CompositeKernel {
    fn select(src: PixelFormat, dst: PixelFormat, alpha: u8) -> Option<Self> {
        match (src, dst) {
            (PixelFormat::I, PixelFormat::Ia) if alpha == 255 => Some(Self::MaskOnIaOpaque),
            (PixelFormat::I, PixelFormat::Ia) => Some(Self::MaskOnIa),
            (PixelFormat::I, PixelFormat::Bgr32) => Some(Self::MaskOnBgr32),
            _ => None,
        }
    }

    fn dst_bpp(self) -> usize {
        match self {
            Self::MaskOnIa | Self::MaskOnIaOpaque => 2,
            Self::MaskOnBgr32 => 4,
        }
    }

    fn run_row(self, dst: &mut [u8], mask: &[u8], color: Rgba8) {
        match self {
            Self::MaskOnIa => {
                for (d, &cov) in dst.chunks_exact_mut(2).zip(mask) {
                    let sa = coverage_alpha(cov, color.a);
                    if sa == 0 {
                        continue;
                    }
                    let ([i], a) = over([color.r], sa, [d[0]], d[1]);
                    d[0] = i;
                    d[1] = a;
                }
            }
            Self::MaskOnIaOpaque => {
                for (d, &cov) in dst.chunks_exact_mut(2).zip(mask) {
                    match cov {
                        0 => {}
                        255 => {
                            d[0] = color.r;
                            d[1] = 255;
                        }
                        _ => {
                            let ([i], a) = over([color.r], cov, [d[0]], d[1]);
                            d[0] = i;
                            d[1] = a;
                        }
                    }
                }
            }
            Self::MaskOnBgr32 => {
                for (d, &cov) in dst.chunks_exact_mut(4).zip(mask) {
                    let sa = coverage_alpha(cov, color.a);
                    if sa == 0 {
                        continue;
                    }
                    let ([r, g, b], a) =
                        over([color.r, color.g, color.b], sa, [d[0], d[1], d[2]], d[3]);
                    d.copy_from_slice(&[r, g, b, a]);
                }
            }
        }
    }
}

/// Blend the coverage `mask` (format `I`) in `color` onto `dst` at `(xdisp, ydisp)`.
///
/// Coordinates address the full buffers, margins included. Only the overlap of
/// the displaced mask with `dst` is touched. Destinations other than `IA` and
/// `BGR32`, or a mask that is not `I`, leave `dst` unchanged.
pub fn composite(dst: &mut Raster, mask: &Raster, xdisp: i32, ydisp: i32, color: Rgba8) {
    let Some(kernel) = CompositeKernel::select(mask.format(), dst.format(), color.a) else {
        tracing::trace!(
            src = ?mask.format(),
            dst = ?dst.format(),
            "composite: unsupported format pair"
        );
        return;
    };
    let bpp = kernel.dst_bpp();

    let xdisp = i64::from(xdisp);
    let mut width = mask.full_width() as i64;
    let (src_x0, dst_x0) = if xdisp < 0 {
        width += xdisp;
        ((-xdisp) as usize, 0usize)
    } else {
        (0usize, xdisp as usize)
    };
    let dst_w = dst.full_width() as i64;
    if width + dst_x0 as i64 > dst_w {
        width = dst_w - dst_x0 as i64;
    }
    if width <= 0 {
        return;
    }
    let width = width as usize;

    let dst_h = dst.full_height() as i64;
    for y in 0..mask.full_height() {
        let wy = y as i64 + i64::from(ydisp);
        if wy < 0 || wy >= dst_h {
            continue;
        }
        let src = &mask.row(y)[src_x0..src_x0 + width];
        let row = dst.row_mut(wy as usize);
        kernel.run_row(&mut row[dst_x0 * bpp..(dst_x0 + width) * bpp], src, color);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
