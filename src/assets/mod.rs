//! Decoding and rescaling collaborators used by the loader.

/// Decoded picture model and decoder traits.
pub mod decode;
/// Resampling and byte-order conversion.
pub mod rescale;
/// SVG rasterisation through `resvg`.
pub mod svg_raster;
