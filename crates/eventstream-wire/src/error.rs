//! Error types for the event-stream wire codec.

use thiserror::Error;

/// Errors produced while encoding or decoding the
/// `application/vnd.amazon.eventstream` wire format.
#[derive(Error, Debug)]
pub enum WireError {
    /// Bytes are missing or truncated; the frame cannot be parsed as a
    /// prelude+body+crc structure.
    #[error("invalid event bytes: frame is truncated")]
    InvalidEventBytes,

    /// A computed CRC32 did not match the value carried on the wire.
    #[error("checksum mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        /// CRC32 read from the wire.
        expected: u32,
        /// CRC32 computed over the received bytes.
        actual: u32,
    },

    /// `headers_length` exceeds the 128 KiB bound.
    #[error("invalid headers length: {0} exceeds the 128 KiB bound")]
    InvalidHeadersLength(u32),

    /// The derived payload length exceeds the 16 MiB bound.
    #[error("invalid payload length: {0} exceeds the 16 MiB bound")]
    InvalidPayloadLength(u32),

    /// A header's type tag is unknown, or its value is ill-formed.
    #[error("invalid header value for type tag {tag}")]
    InvalidHeaderValue {
        /// The offending type tag.
        tag: u8,
    },

    /// A byte-array or string header value exceeds 32767 bytes.
    #[error("invalid header value length: {0} exceeds 32767 bytes")]
    InvalidHeaderValueLength(usize),

    /// An integer header value does not fit its declared width.
    #[error("invalid integer value: does not fit in {width}")]
    InvalidIntegerValue {
        /// Name of the width the value was declared to fit (e.g. "i8").
        width: &'static str,
    },

    /// Two headers in the same frame share a name.
    #[error("duplicate header: {0:?}")]
    DuplicateHeader(String),

    /// A header name was empty, or longer than 255 bytes.
    #[error("invalid header name length")]
    InvalidHeaderName,

    /// A string header or name was not valid UTF-8.
    #[error("invalid utf-8 in header: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The underlying byte source or sink failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, WireError>;
