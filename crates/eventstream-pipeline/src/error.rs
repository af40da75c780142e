//! Error type for the event pipeline.

use thiserror::Error;

/// Errors raised while serializing/deserializing modeled events or driving
/// the publisher/receiver lifecycle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A wire-level framing failure (bad CRC, truncated bytes, bad length, ...).
    #[error("wire framing error: {0}")]
    Wire(#[from] eventstream_wire::WireError),

    /// Chunk-signing failure.
    #[error("event signing error: {0}")]
    Sign(#[from] eventstream_sign::SignError),

    /// The underlying sink or source failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// `send`/`receive` was called on an already-closed half.
    #[error("operation attempted on a closed publisher or receiver")]
    Closed,

    /// A well-formed frame carrying `:message-type = "error"`.
    #[error("unmodeled event error {code}: {message}")]
    UnmodeledEventError {
        /// The `:error-code` header value.
        code: String,
        /// The `:error-message` header value.
        message: String,
    },

    /// A well-formed `"exception"` frame whose payload deserialized into a
    /// modeled error. Carries the boxed modeled error as its source.
    #[error("modeled event error: {0}")]
    ModeledEventError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The stream ended before an `"initial-response"` frame was seen.
    #[error("stream ended before an initial-response frame was received")]
    MissingInitialResponse,

    /// `:message-type` was present but not one of `event`/`exception`/`error`.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// A header required to dispatch or deserialize a frame was absent.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// The injected payload codec failed to encode or decode.
    #[error("payload codec error: {0}")]
    Codec(String),
}

/// Convert a pipeline error to `io::Error` for callers that must hand it to
/// an API expecting one (e.g. a transport trait object).
///
/// Only for boundary conversion — internally this crate uses `PipelineError`.
impl From<PipelineError> for std::io::Error {
    fn from(err: PipelineError) -> Self {
        let kind = match &err {
            PipelineError::Io(io_err) => return Self::new(io_err.kind(), err.to_string()),
            PipelineError::Wire(_)
            | PipelineError::UnknownMessageType(_)
            | PipelineError::MissingHeader(_)
            | PipelineError::MissingInitialResponse
            | PipelineError::Codec(_) => std::io::ErrorKind::InvalidData,
            PipelineError::Closed => std::io::ErrorKind::NotConnected,
            PipelineError::UnmodeledEventError { .. }
            | PipelineError::ModeledEventError(_)
            | PipelineError::Sign(_) => std::io::ErrorKind::Other,
        };
        Self::new(kind, err.to_string())
    }
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
