//! Rendering of vector canvases into rasters.

/// `tiny-skia` backed vector rasteriser.
pub mod cpu;
