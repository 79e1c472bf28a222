//! Shared vocabulary: pixel formats, orientation, colours, flags and errors.

/// Format enums, orientation, colours and bit flags.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
