//! Pixmap core: an image buffer engine.
//!
//! Images live in one of three representations ([`Pixmap`]): a coded file
//! buffer, a raster with a transparent margin, or a list of vector drawing
//! commands. The crate provides
//!
//! - fixed-point compositing, box blur, drop shadows and rounded corners on rasters
//! - a [`PixmapLoader`] that decodes coded images, picks the output size and
//!   layout, and converts through a rescaler with fallbacks
//! - a `tiny-skia` rasteriser for [`VectorCanvas`] command streams
#![forbid(unsafe_code)]

pub mod assets;
pub mod buffer;
pub mod effects;
pub mod foundation;
pub mod pipeline;
pub mod render;

pub use crate::foundation::core::{
    CodedFormat, Corners, Orientation, PixelFormat, PixmapFlags, Rgba8,
};
pub use crate::foundation::error::{PixmapError, PixmapResult};

pub use crate::assets::decode::{
    Decoder, ImageDecoder, Plane, RawPicture, SourcePixelFormat, VectorRasterizer,
};
pub use crate::assets::rescale::{ImageRescaler, Rescaler, ResizeFilter};
pub use crate::assets::svg_raster::SvgRasterizer;
pub use crate::buffer::pixmap::{CodedImage, Pixmap, Raster, SharedPixmap};
pub use crate::buffer::vector::{VecCmd, VecOpcode, VectorCanvas};
pub use crate::effects::blur::{box_blur, drop_shadow};
pub use crate::effects::composite::{composite, over};
pub use crate::effects::corners::rounded_corners;
pub use crate::effects::gradient::{GradientSpec, gradient_pixmap, horizontal_gradient};
pub use crate::pipeline::orchestrator::{PixmapLoader, ResolvedSize, resolve_dimensions};
pub use crate::pipeline::request::{ImageRequest, LoaderOpts};
pub use crate::render::cpu::rasterize_vector;
