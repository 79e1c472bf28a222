/// Convenience result type used across the pixmap engine.
pub type PixmapResult<T> = Result<T, PixmapError>;

/// Top-level error taxonomy for buffer, effect and decode operations.
#[derive(thiserror::Error, Debug)]
pub enum PixmapError {
    /// An allocation (pixel store, scratch table, coded buffer) could not be satisfied.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// No decoder or conversion exists for the requested format.
    #[error("unsupported format: {0}")]
    Unsupported(String),

    /// The decoder collaborator failed or produced an empty picture.
    #[error("decode error: {0}")]
    Decode(String),

    /// The rescale/convert collaborator failed.
    #[error("rescale error: {0}")]
    Rescale(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing request records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixmapError {
    /// Build a [`PixmapError::OutOfMemory`] value.
    pub fn out_of_memory(msg: impl Into<String>) -> Self {
        Self::OutOfMemory(msg.into())
    }

    /// Build a [`PixmapError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`PixmapError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PixmapError::Rescale`] value.
    pub fn rescale(msg: impl Into<String>) -> Self {
        Self::Rescale(msg.into())
    }

    /// Build a [`PixmapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixmapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True when the failure was caused by an allocation.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory(_))
    }
}

impl From<std::collections::TryReserveError> for PixmapError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
