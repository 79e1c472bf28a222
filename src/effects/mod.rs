//! In-place and copying effects on raster pixmaps.
//!
//! All arithmetic is fixed point; results are bit exact across platforms.

/// Integral-image box blur and drop shadow.
pub mod blur;
/// Alpha compositing and mask tinting.
pub mod composite;
/// Rounded-corner alpha cut-outs.
pub mod corners;
/// Dithered top-to-bottom colour gradients.
pub mod gradient;
