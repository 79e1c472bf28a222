use anyhow::Context;

use crate::assets::decode::{RawPicture, SourcePixelFormat, VectorRasterizer};
use crate::buffer::pixmap::CodedImage;
use crate::foundation::core::CodedFormat;
use crate::foundation::error::{PixmapError, PixmapResult};

/// Largest edge the SVG rasterizer will allocate.
pub const SVG_MAX_DIM: u32 = 16_384;

/// Default vector rasterizer backed by `usvg`/`resvg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgRasterizer;

impl SvgRasterizer {
    pub fn parse(bytes: &[u8]) -> PixmapResult<usvg::Tree> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
        Ok(tree)
    }
}

/// Raster size for an SVG with intrinsic size `(iw, ih)` and an optional request.
///
/// A single requested edge keeps the intrinsic aspect ratio.
pub fn svg_raster_size(
    iw: f32,
    ih: f32,
    width: Option<u32>,
    height: Option<u32>,
) -> PixmapResult<(u32, u32)> {
    fn to_px(v: f32) -> PixmapResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PixmapError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let (w, h) = match (width, height) {
        (Some(w), Some(h)) => (w.max(1), h.max(1)),
        (Some(w), None) => (w.max(1), to_px(w as f32 * ih / iw)?),
        (None, Some(h)) => (to_px(h as f32 * iw / ih)?, h.max(1)),
        (None, None) => (to_px(iw)?, to_px(ih)?),
    };

    if w > SVG_MAX_DIM || h > SVG_MAX_DIM {
        return Err(PixmapError::decode(format!(
            "svg raster size too large: {w}x{h} (max {SVG_MAX_DIM}x{SVG_MAX_DIM})"
        )));
    }
    Ok((w, h))
}

impl VectorRasterizer for SvgRasterizer {
    fn rasterize(
        &self,
        image: &CodedImage,
        width: Option<u32>,
        height: Option<u32>,
    ) -> PixmapResult<RawPicture> {
        if image.format() != CodedFormat::Svg {
            return Err(PixmapError::unsupported(format!(
                "vector rasterizer cannot handle {:?}",
                image.format()
            )));
        }
        let tree = Self::parse(image.bytes())?;
        let size = tree.size();
        let (w, h) = svg_raster_size(size.width(), size.height(), width, height)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| PixmapError::out_of_memory("failed to allocate svg pixmap"))?;
        let xform = resvg::tiny_skia::Transform::from_scale(
            w as f32 / size.width(),
            h as f32 / size.height(),
        );
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        let mut rgba = Vec::new();
        rgba.try_reserve_exact(w as usize * h as usize * 4)?;
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(RawPicture::packed(SourcePixelFormat::Rgba32, w, h, rgba))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
