use thiserror::Error;

/// Errors produced while encoding or decoding blur hashes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Pixel grid has a zero dimension or a buffer of the wrong length
    #[error("Invalid pixel grid: {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },

    /// Hash string has the wrong length or contains characters outside the alphabet
    #[error("Malformed hash: {reason}")]
    MalformedHash { reason: String },

    /// Requested decode dimensions are zero
    #[error("Invalid decode dimensions: {width}x{height}")]
    DimensionMismatch { width: u32, height: u32 },

    /// Component counts outside [1, 9]
    #[error("Invalid component counts: {x}x{y} (each must be between 1 and 9)")]
    InvalidComponents { x: u32, y: u32 },
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::MalformedHash {
            reason: reason.into(),
        }
    }
}

/// Errors produced while rasterizing a decoded grid
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// PNG serialization failed
    #[error("Failed to encode placeholder image: {message}")]
    EncodeFailed { message: String },
}

/// Errors reported by a render cache backend
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backing store could not be reached or refused the operation
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced while turning a source image into a stored placeholder
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// Source bytes could not be decoded as an image
    #[error("Failed to decode source image: {message}")]
    Decode { message: String },

    /// Persistence collaborator rejected the write or read
    #[error("Placeholder store error: {0}")]
    Store(String),
}

/// Top-level error for placeholder operations
#[derive(Debug, Clone, Error)]
pub enum PlaceholderError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}
