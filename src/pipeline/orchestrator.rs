use std::sync::Arc;

use crate::assets::decode::{
    Decoder, ImageDecoder, RawPicture, SourcePixelFormat, VectorRasterizer,
};
use crate::assets::rescale::{ImageRescaler, Rescaler, swizzle_to_rgba};
use crate::assets::svg_raster::SvgRasterizer;
use crate::buffer::pixmap::{CodedImage, Pixmap, Raster};
use crate::foundation::core::{Orientation, PixelFormat, PixmapFlags};
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::pipeline::request::{ImageRequest, LoaderOpts};

/// Target size chosen by [`resolve_dimensions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSize {
    pub width: u32,
    pub height: u32,
    /// The thumbnail rule picked the size.
    pub thumbnail: bool,
}

/// `v * num / den` with truncation, saturating at `u32::MAX`; 0 when `den` is 0.
fn proportional(v: u32, num: u32, den: u32) -> u32 {
    if den == 0 {
        return 0;
    }
    let r = u64::from(v) * u64::from(num) / u64::from(den);
    u32::try_from(r).unwrap_or(u32::MAX)
}

/// Resolve the output size of a `src_w` x `src_h` picture under `req`.
///
/// Rules, first match wins: both edges requested; width only; height only;
/// thumbnail (short edge fixed) for sources above the small-source limit;
/// otherwise the source size, clamped by `max_width` then `max_height` when
/// the source is above the limit. Edges never resolve below 1.
pub fn resolve_dimensions(
    req: &ImageRequest,
    opts: &LoaderOpts,
    src_w: u32,
    src_h: u32,
) -> ResolvedSize {
    let big = src_w > opts.small_source_limit && src_h > opts.small_source_limit;
    let mut thumbnail = false;

    let (w, h) = match (req.request_width, req.request_height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, proportional(w, src_h, src_w)),
        (None, Some(h)) => (proportional(h, src_w, src_h), h),
        (None, None) if req.want_thumbnail && big => {
            thumbnail = true;
            let edge = opts.thumbnail_edge;
            if src_w <= src_h {
                (edge, proportional(edge, src_h, src_w))
            } else {
                (proportional(edge, src_w, src_h), edge)
            }
        }
        (None, None) => {
            let (mut w, mut h) = (src_w, src_h);
            if big {
                if req.max_width != 0 && w > req.max_width {
                    h = proportional(h, req.max_width, w);
                    w = req.max_width;
                }
                if req.max_height != 0 && h > req.max_height {
                    w = proportional(w, req.max_height, h);
                    h = req.max_height;
                }
            }
            (w, h)
        }
    };

    ResolvedSize {
        width: w.max(1),
        height: h.max(1),
        thumbnail,
    }
}

/// How a decoded picture reaches its raster layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FormatPlan {
    /// Layout the picture can be copied into as is, if any.
    passthrough: Option<PixelFormat>,
    /// Layout requested from the rescaler.
    rescale_to: PixelFormat,
}

impl FormatPlan {
    fn choose(picture: &RawPicture, req: &ImageRequest) -> Self {
        let want_alpha = req.disallow_rgb24 || req.corner_radius != 0;
        let passthrough = match picture.format {
            SourcePixelFormat::Rgb24 if !want_alpha => Some(PixelFormat::Rgb24),
            SourcePixelFormat::Rgba32 => Some(PixelFormat::Bgr32),
            SourcePixelFormat::GrayA8 if req.mono_allowed => Some(PixelFormat::Ia),
            SourcePixelFormat::Gray8 if req.mono_allowed => Some(PixelFormat::I),
            _ => None,
        };
        let rescale_to = if picture.has_alpha() || want_alpha {
            PixelFormat::Bgr32
        } else {
            PixelFormat::Rgb24
        };
        Self {
            passthrough,
            rescale_to,
        }
    }
}

/// Raster layout that stores a packed picture byte for byte.
fn raster_format(format: SourcePixelFormat) -> Option<PixelFormat> {
    match format {
        SourcePixelFormat::Gray8 => Some(PixelFormat::I),
        SourcePixelFormat::GrayA8 => Some(PixelFormat::Ia),
        SourcePixelFormat::Rgb24 => Some(PixelFormat::Rgb24),
        SourcePixelFormat::Rgba32 => Some(PixelFormat::Bgr32),
        _ => None,
    }
}

/// Copy a picture whose layout matches a raster format into a new raster.
pub fn raster_from_picture(picture: &RawPicture, margin: u32) -> PixmapResult<Raster> {
    let format = raster_format(picture.format).ok_or_else(|| {
        PixmapError::unsupported(format!("no raster layout for {:?}", picture.format))
    })?;
    picture.validate()?;
    let plane = picture.plane()?;

    let mut raster = Raster::new(picture.width, picture.height, format, margin)?;
    raster.copy_rows_from(
        &plane.data,
        plane.stride,
        picture.height as usize,
        picture.row_bytes(),
    );
    Ok(raster)
}

/// Turns coded images into rasters using the injected collaborators.
#[derive(Clone)]
pub struct PixmapLoader {
    decoder: Arc<dyn Decoder>,
    accelerated: Option<Arc<dyn Decoder>>,
    vector: Arc<dyn VectorRasterizer>,
    rescaler: Arc<dyn Rescaler>,
    opts: LoaderOpts,
}

impl Default for PixmapLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PixmapLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapLoader")
            .field("decoder", &self.decoder.name())
            .field("accelerated", &self.accelerated.as_ref().map(|d| d.name()))
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl PixmapLoader {
    /// Loader with the `image`, `resvg` and `imageops` based collaborators.
    pub fn new() -> Self {
        Self {
            decoder: Arc::new(ImageDecoder),
            accelerated: None,
            vector: Arc::new(SvgRasterizer),
            rescaler: Arc::new(ImageRescaler),
            opts: LoaderOpts::default(),
        }
    }

    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Decoder tried before the default one. Its failures, empty pictures
    /// included, fall through to the default path.
    pub fn with_accelerated_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.accelerated = Some(Arc::new(decoder));
        self
    }

    pub fn with_vector_rasterizer(mut self, rasterizer: impl VectorRasterizer + 'static) -> Self {
        self.vector = Arc::new(rasterizer);
        self
    }

    pub fn with_rescaler(mut self, rescaler: impl Rescaler + 'static) -> Self {
        self.rescaler = Arc::new(rescaler);
        self
    }

    pub fn with_opts(mut self, opts: LoaderOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn opts(&self) -> &LoaderOpts {
        &self.opts
    }

    /// Decode a pixmap of any representation.
    ///
    /// Coded images become rasters. A raster only gets its aspect ratio
    /// refreshed; a vector canvas is returned untouched.
    pub fn decode(&self, pixmap: Pixmap, req: &ImageRequest) -> PixmapResult<Pixmap> {
        match pixmap {
            Pixmap::Coded(coded) => self.decode_coded(coded, req).map(Pixmap::Raster),
            Pixmap::Raster(mut raster) => {
                raster.set_aspect(Orientation::Normal.aspect(raster.width(), raster.height()));
                Ok(Pixmap::Raster(raster))
            }
            v @ Pixmap::Vector(_) => Ok(v),
        }
    }

    /// Decode, size and convert a coded image. The coded buffer is consumed.
    #[tracing::instrument(level = "debug", skip(self, coded, req), fields(format = ?coded.format(), len = coded.len()))]
    pub fn decode_coded(&self, coded: CodedImage, req: &ImageRequest) -> PixmapResult<Raster> {
        let orientation = coded.orientation();
        let picture = self.decode_picture(&coded, req)?;
        drop(coded);
        self.from_picture(&picture, req, orientation)
    }

    fn decode_picture(&self, coded: &CodedImage, req: &ImageRequest) -> PixmapResult<RawPicture> {
        let format = coded.format();
        if let Some(acc) = self.accelerated.as_deref().filter(|d| d.supports(format)) {
            match acc.decode(coded).and_then(check_dimensions) {
                Ok(picture) => return Ok(picture),
                Err(e) => {
                    tracing::debug!(decoder = acc.name(), error = %e, "accelerated decode failed")
                }
            }
        }

        if format.is_vector() {
            let picture = self
                .vector
                .rasterize(coded, req.request_width, req.request_height)?;
            return check_dimensions(picture);
        }

        if !self.decoder.supports(format) {
            return Err(PixmapError::unsupported(format!(
                "no codec for image format {format:?}"
            )));
        }
        let picture = self.decoder.decode(coded).map_err(|e| {
            let (w, h) = self.decoder.dimensions(coded).unwrap_or((0, 0));
            PixmapError::decode(format!("unable to decode image of size ({w} x {h}): {e:#}"))
        })?;
        check_dimensions(picture)
    }

    /// Size and convert an already decoded picture into a raster.
    ///
    /// `orientation` is stored on the result and decides whether the aspect
    /// ratio, computed from the resolved size, is inverted.
    pub fn from_picture(
        &self,
        picture: &RawPicture,
        req: &ImageRequest,
        orientation: Orientation,
    ) -> PixmapResult<Raster> {
        let size = resolve_dimensions(req, &self.opts, picture.width, picture.height);
        tracing::debug!(
            src_w = picture.width,
            src_h = picture.height,
            dst_w = size.width,
            dst_h = size.height,
            thumbnail = size.thumbnail,
            "resolved dimensions"
        );

        let mut raster = self.convert(picture, req, size)?;
        raster.set_orientation(orientation);
        raster.set_aspect(orientation.aspect(size.width, size.height));
        if size.thumbnail {
            raster.insert_flags(PixmapFlags::THUMBNAIL);
        }
        Ok(raster)
    }

    fn convert(
        &self,
        picture: &RawPicture,
        req: &ImageRequest,
        size: ResolvedSize,
    ) -> PixmapResult<Raster> {
        let plan = FormatPlan::choose(picture, req);
        let want_rescale = (size.width, size.height) != (picture.width, picture.height);
        let filter = self.opts.filter;

        let mut failure = None;
        if want_rescale || plan.passthrough.is_none() {
            tracing::debug!(from = ?picture.format, to = ?plan.rescale_to, "rescale");
            match self
                .rescaler
                .rescale(picture, size.width, size.height, plan.rescale_to, filter)
            {
                Ok(out) => return raster_from_picture(&out, req.margin),
                Err(e) => {
                    tracing::warn!(error = %e, "rescale failed");
                    failure = Some(e);
                }
            }
        }

        let Some(passthrough) = plan.passthrough else {
            if want_rescale {
                match self.rescaler.rescale(
                    picture,
                    picture.width,
                    picture.height,
                    plan.rescale_to,
                    filter,
                ) {
                    Ok(out) => return raster_from_picture(&out, req.margin),
                    Err(e) => failure = Some(e),
                }
            }
            tracing::warn!(
                format = ?picture.format,
                "format conversion failed, trying byte swizzle"
            );
            return match swizzle_to_rgba(picture) {
                Ok(out) => raster_from_picture(&out, req.margin),
                Err(e) => Err(failure.unwrap_or(e)),
            };
        };

        tracing::debug!(format = ?passthrough, "copy");
        raster_from_picture(picture, req.margin)
    }
}

fn check_dimensions(picture: RawPicture) -> PixmapResult<RawPicture> {
    if picture.width == 0 || picture.height == 0 {
        return Err(PixmapError::decode(format!(
            "unable to decode image of size ({} x {})",
            picture.width, picture.height
        )));
    }
    Ok(picture)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
