use thiserror::Error;

/// Result type alias for operations that may fail with [`TraceError`].
pub type PixtraceResult<T> = std::result::Result<T, TraceError>;

/// Error types that can occur while decoding, tracing, or emitting an image.
///
/// Decode failures are raised before the tracing pipeline starts. Everything
/// the pipeline itself rejects is raised at entry, never from inside the
/// sampling loop.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Image loading or decoding error.
    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
    /// The decoded image has no pixels to trace.
    #[error("Decoded image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Zero-area buffer or out-of-range configuration.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The delegated vectorizer failed or returned nothing.
    #[error("External vectorizer failed: {0}")]
    ExternalService(String),
    /// A background trace worker could not deliver its result.
    #[error("Trace worker failed: {0}")]
    Worker(String),
    /// The trace completed but produced no shapes.
    #[error("Trace produced no shapes")]
    EmptyResult,
}

impl TraceError {
    /// Whether the error originates from reading the source image rather than from tracing it.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, TraceError::Decode(_) | TraceError::EmptyImage { .. })
    }
}
