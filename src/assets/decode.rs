use std::io::Cursor;

use anyhow::Context;

use crate::buffer::pixmap::CodedImage;
use crate::foundation::core::{CodedFormat, Rgba8};
use crate::foundation::error::{PixmapError, PixmapResult};

/// Pixel layout of a decoded picture before it is turned into a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourcePixelFormat {
    Gray8,
    GrayA8,
    Rgb24,
    /// Bytes R, G, B, A.
    Rgba32,
    /// Bytes B, G, R, A.
    Bgra32,
    /// Bytes A, R, G, B.
    Argb32,
    /// Bytes A, B, G, R.
    Abgr32,
    /// One palette index per pixel.
    Pal8,
}

impl SourcePixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 | Self::Pal8 => 1,
            Self::GrayA8 => 2,
            Self::Rgb24 => 3,
            Self::Rgba32 | Self::Bgra32 | Self::Argb32 | Self::Abgr32 => 4,
        }
    }

    /// Whether pixels carry their own alpha channel. Palettes are checked separately.
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            Self::GrayA8 | Self::Rgba32 | Self::Bgra32 | Self::Argb32 | Self::Abgr32
        )
    }

    /// Byte positions of R, G, B and A inside a 4-byte pixel.
    pub const fn rgba_order(self) -> Option<[usize; 4]> {
        match self {
            Self::Rgba32 => Some([0, 1, 2, 3]),
            Self::Bgra32 => Some([2, 1, 0, 3]),
            Self::Argb32 => Some([1, 2, 3, 0]),
            Self::Abgr32 => Some([3, 2, 1, 0]),
            _ => None,
        }
    }
}

/// One image plane: rows of `stride` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    pub data: Vec<u8>,
    pub stride: usize,
}

/// Raw pixel planes produced by a decoder collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPicture {
    pub format: SourcePixelFormat,
    pub width: u32,
    pub height: u32,
    pub planes: Vec<Plane>,
    /// Colour table for [`SourcePixelFormat::Pal8`].
    pub palette: Option<Vec<Rgba8>>,
}

impl RawPicture {
    /// Single tightly packed plane.
    pub fn packed(format: SourcePixelFormat, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            format,
            width,
            height,
            planes: vec![Plane {
                data,
                stride: width as usize * format.bytes_per_pixel(),
            }],
            palette: None,
        }
    }

    pub fn with_palette(mut self, palette: Vec<Rgba8>) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Bytes of one visible row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// The pixel plane. Every supported format is single-plane.
    pub fn plane(&self) -> PixmapResult<&Plane> {
        self.planes
            .first()
            .ok_or_else(|| PixmapError::validation("picture has no pixel plane"))
    }

    /// True when any pixel can be non-opaque.
    pub fn has_alpha(&self) -> bool {
        match self.format {
            SourcePixelFormat::Pal8 => self
                .palette
                .as_ref()
                .is_some_and(|p| p.iter().any(|c| c.a != 255)),
            f => f.has_alpha(),
        }
    }

    /// Check that the plane covers `height` rows of `row_bytes` at its stride.
    pub fn validate(&self) -> PixmapResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PixmapError::decode(format!(
                "empty picture ({} x {})",
                self.width, self.height
            )));
        }
        let plane = self.plane()?;
        let need = plane.stride * (self.height as usize - 1) + self.row_bytes();
        if plane.stride < self.row_bytes() || plane.data.len() < need {
            return Err(PixmapError::validation(format!(
                "plane too small for {} x {} {:?}: {} bytes, stride {}",
                self.width,
                self.height,
                self.format,
                plane.data.len(),
                plane.stride
            )));
        }
        if self.format == SourcePixelFormat::Pal8 && self.palette.is_none() {
            return Err(PixmapError::validation("palettized picture without palette"));
        }
        Ok(())
    }
}

/// Bitmap decoder collaborator.
pub trait Decoder: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn supports(&self, format: CodedFormat) -> bool;

    fn decode(&self, image: &CodedImage) -> PixmapResult<RawPicture>;

    /// Dimensions from the image header, without decoding the pixels.
    fn dimensions(&self, _image: &CodedImage) -> Option<(u32, u32)> {
        None
    }
}

/// Vector image collaborator, rendering at a requested size.
///
/// `None` for a dimension means "derive from the intrinsic size".
pub trait VectorRasterizer: Send + Sync {
    fn rasterize(
        &self,
        image: &CodedImage,
        width: Option<u32>,
        height: Option<u32>,
    ) -> PixmapResult<RawPicture>;
}

/// Default bitmap decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    fn image_format(format: CodedFormat) -> Option<image::ImageFormat> {
        Some(match format {
            CodedFormat::Png => image::ImageFormat::Png,
            CodedFormat::Jpeg => image::ImageFormat::Jpeg,
            CodedFormat::Gif => image::ImageFormat::Gif,
            CodedFormat::Bmp => image::ImageFormat::Bmp,
            CodedFormat::Webp => image::ImageFormat::WebP,
            CodedFormat::Svg => return None,
        })
    }
}

impl Decoder for ImageDecoder {
    fn name(&self) -> &'static str {
        "image"
    }

    fn supports(&self, format: CodedFormat) -> bool {
        Self::image_format(format).is_some()
    }

    fn decode(&self, image: &CodedImage) -> PixmapResult<RawPicture> {
        let fmt = Self::image_format(image.format()).ok_or_else(|| {
            PixmapError::unsupported(format!("no bitmap codec for {:?}", image.format()))
        })?;
        let dyn_img = image::load_from_memory_with_format(image.bytes(), fmt)
            .with_context(|| format!("decode {fmt:?} image from memory"))?;
        Ok(picture_from_dynamic(dyn_img))
    }

    fn dimensions(&self, image: &CodedImage) -> Option<(u32, u32)> {
        let fmt = Self::image_format(image.format())?;
        image::ImageReader::with_format(Cursor::new(image.bytes()), fmt)
            .into_dimensions()
            .ok()
    }
}

/// Narrow a decoded `image` buffer to the closest 8-bit source format.
pub(crate) fn picture_from_dynamic(img: image::DynamicImage) -> RawPicture {
    use image::DynamicImage as D;

    let (w, h) = (img.width(), img.height());
    match img {
        D::ImageLuma8(b) => RawPicture::packed(SourcePixelFormat::Gray8, w, h, b.into_raw()),
        D::ImageLumaA8(b) => RawPicture::packed(SourcePixelFormat::GrayA8, w, h, b.into_raw()),
        D::ImageRgb8(b) => RawPicture::packed(SourcePixelFormat::Rgb24, w, h, b.into_raw()),
        D::ImageRgba8(b) => RawPicture::packed(SourcePixelFormat::Rgba32, w, h, b.into_raw()),
        D::ImageLuma16(_) => {
            RawPicture::packed(SourcePixelFormat::Gray8, w, h, img.to_luma8().into_raw())
        }
        D::ImageLumaA16(_) => {
            RawPicture::packed(SourcePixelFormat::GrayA8, w, h, img.to_luma_alpha8().into_raw())
        }
        D::ImageRgb16(_) | D::ImageRgb32F(_) => {
            RawPicture::packed(SourcePixelFormat::Rgb24, w, h, img.to_rgb8().into_raw())
        }
        _ => RawPicture::packed(SourcePixelFormat::Rgba32, w, h, img.to_rgba8().into_raw()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
