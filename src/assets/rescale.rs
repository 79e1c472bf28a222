use serde::{Deserialize, Serialize};

use crate::assets::decode::{RawPicture, SourcePixelFormat};
use crate::foundation::core::PixelFormat;
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::foundation::math::{checked_area, try_alloc};

/// Resampling kernel used by the rescaler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for image::imageops::FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest => Self::Nearest,
            ResizeFilter::Triangle => Self::Triangle,
            ResizeFilter::CatmullRom => Self::CatmullRom,
            ResizeFilter::Gaussian => Self::Gaussian,
            ResizeFilter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Rescale/convert collaborator.
///
/// Produces a packed picture of `width` x `height` in `dst`, which is either
/// [`PixelFormat::Rgb24`] (returned as [`SourcePixelFormat::Rgb24`]) or
/// [`PixelFormat::Bgr32`] (returned as [`SourcePixelFormat::Rgba32`], the same
/// byte order).
pub trait Rescaler: Send + Sync {
    fn rescale(
        &self,
        picture: &RawPicture,
        width: u32,
        height: u32,
        dst: PixelFormat,
        filter: ResizeFilter,
    ) -> PixmapResult<RawPicture>;
}

/// Default rescaler backed by `image::imageops::resize`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageRescaler;

impl Rescaler for ImageRescaler {
    fn rescale(
        &self,
        picture: &RawPicture,
        width: u32,
        height: u32,
        dst: PixelFormat,
        filter: ResizeFilter,
    ) -> PixmapResult<RawPicture> {
        if !matches!(dst, PixelFormat::Rgb24 | PixelFormat::Bgr32) {
            return Err(PixmapError::rescale(format!("cannot produce {dst:?}")));
        }
        if width == 0 || height == 0 {
            return Err(PixmapError::rescale(format!(
                "invalid target size {width} x {height}"
            )));
        }
        picture.validate()?;

        let rgba = expand_rgba(picture)?;
        let mut img = image::RgbaImage::from_raw(picture.width, picture.height, rgba)
            .ok_or_else(|| PixmapError::rescale("expanded buffer does not match picture size"))?;
        if (width, height) != (picture.width, picture.height) {
            img = image::imageops::resize(&img, width, height, filter.into());
        }

        Ok(match dst {
            PixelFormat::Rgb24 => {
                let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
                RawPicture::packed(SourcePixelFormat::Rgb24, width, height, rgb.into_raw())
            }
            _ => RawPicture::packed(SourcePixelFormat::Rgba32, width, height, img.into_raw()),
        })
    }
}

/// Reorder a 4-byte picture (`Bgra32`, `Argb32`, `Abgr32`, `Rgba32`) into
/// R, G, B, A bytes, the [`PixelFormat::Bgr32`] layout, at its own size.
pub fn swizzle_to_rgba(picture: &RawPicture) -> PixmapResult<RawPicture> {
    if picture.format.rgba_order().is_none() {
        return Err(PixmapError::unsupported(format!(
            "no byte swizzle from {:?}",
            picture.format
        )));
    }
    picture.validate()?;
    let rgba = expand_rgba(picture)?;
    Ok(RawPicture::packed(
        SourcePixelFormat::Rgba32,
        picture.width,
        picture.height,
        rgba,
    ))
}

/// Tightly packed straight RGBA copy of any source format.
///
/// Palette entries with zero alpha, and indices past the palette, become
/// transparent black.
pub(crate) fn expand_rgba(picture: &RawPicture) -> PixmapResult<Vec<u8>> {
    let plane = picture.plane()?;
    let (w, h) = (picture.width as usize, picture.height as usize);
    let out_stride = checked_area(w, 4)?;
    let mut out = try_alloc::<u8>(checked_area(out_stride, h)?)?;
    let row_bytes = picture.row_bytes();
    let palette = picture.palette.as_deref().unwrap_or(&[]);

    for (y, dst) in out.chunks_exact_mut(out_stride).enumerate() {
        let src = &plane.data[y * plane.stride..y * plane.stride + row_bytes];
        let px = dst.chunks_exact_mut(4);
        match picture.format {
            SourcePixelFormat::Gray8 => {
                for (d, &g) in px.zip(src) {
                    d.copy_from_slice(&[g, g, g, 255]);
                }
            }
            SourcePixelFormat::GrayA8 => {
                for (d, s) in px.zip(src.chunks_exact(2)) {
                    d.copy_from_slice(&[s[0], s[0], s[0], s[1]]);
                }
            }
            SourcePixelFormat::Rgb24 => {
                for (d, s) in px.zip(src.chunks_exact(3)) {
                    d.copy_from_slice(&[s[0], s[1], s[2], 255]);
                }
            }
            SourcePixelFormat::Pal8 => {
                for (d, &i) in px.zip(src) {
                    match palette.get(usize::from(i)) {
                        Some(c) if c.a != 0 => d.copy_from_slice(&[c.r, c.g, c.b, c.a]),
                        _ => d.fill(0),
                    }
                }
            }
            SourcePixelFormat::Rgba32
            | SourcePixelFormat::Bgra32
            | SourcePixelFormat::Argb32
            | SourcePixelFormat::Abgr32 => {
                let [r, g, b, a] = picture.format.rgba_order().unwrap_or([0, 1, 2, 3]);
                for (d, s) in px.zip(src.chunks_exact(4)) {
                    d.copy_from_slice(&[s[r], s[g], s[b], s[a]]);
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/rescale.rs"]
mod tests;
