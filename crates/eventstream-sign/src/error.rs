//! Error type for chunk signing.

use thiserror::Error;

/// Errors produced while deriving a chunk signature.
///
/// In practice nearly infallible: keyed HMAC does not fail and the chain is
/// driven entirely by caller-supplied config. Kept for symmetry with
/// `eventstream_wire::WireError`/`eventstream_pipeline::PipelineError` and to
/// leave room for a future "missing credentials" variant without a breaking
/// change.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    /// The configured region or service name was empty.
    #[error("signing config field `{field}` must not be empty")]
    EmptyConfigField {
        /// Name of the offending field (`"region"` or `"service"`).
        field: &'static str,
    },

    /// Encoding the `:date`/`:chunk-signature` headers via `eventstream-wire` failed.
    #[error("failed to encode chunk-signing headers: {0}")]
    HeaderEncoding(#[from] eventstream_wire::WireError),
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, SignError>;
