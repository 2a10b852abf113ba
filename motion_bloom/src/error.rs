// THEORY:
// The bloom pipeline is a soft-realtime loop, so almost nothing here is fatal.
// Errors exist for two reasons: rejecting a configuration that can never
// produce a sensible frame, and letting a `FrameSource` report what went wrong
// so the pipeline can log it and carry on with the next frame.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BloomError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A frame arrived whose byte length does not match `4 * width * height`.
    #[error("frame has {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("frame source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BloomError {
    pub fn source_failure<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BloomError::Source(Box::new(error))
    }
}
