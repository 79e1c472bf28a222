//! Pixel buffers in their three representations.

/// Coded, raster and shared pixmaps.
pub mod pixmap;
/// Vector command canvas.
pub mod vector;
