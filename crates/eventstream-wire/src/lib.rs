//! Binary framing codec for the `application/vnd.amazon.eventstream` wire
//! format: typed headers, a checksummed frame envelope, and sync/async
//! readers that pull whole frames off a byte source without over-reading.
//!
//! This crate knows nothing about modeled events, payload codecs, or
//! signing — see `eventstream-pipeline` and `eventstream-sign` for those.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod crc;
pub mod error;
pub mod frame;
pub mod header;
pub mod reader;

pub use error::{Result, WireError};
pub use frame::{Frame, MAX_HEADERS_LENGTH, MAX_PAYLOAD_LENGTH, decode_frame, encode_frame};
pub use header::{
    HeaderValue, Headers, MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, decode_header,
    decode_headers, encode_header, encode_headers,
};
pub use reader::{AsyncFrameReader, FrameReader};
