//! Coded image to raster orchestration.

/// Size and format planning plus the fallback chain.
pub mod orchestrator;
/// Per-call request parameters and loader options.
pub mod request;
