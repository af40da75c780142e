//! Chunked SigV4 "event signing" for `application/vnd.amazon.eventstream`
//! streams: a running HMAC chain that stamps each outgoing frame with a
//! `:date`/`:chunk-signature` header pair derived from the previous frame's
//! signature.
//!
//! Independent of `eventstream-pipeline`; only depends on `eventstream-wire`
//! for encoding the `:date`/`:chunk-signature` headers themselves.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chunk;
mod clock;
mod error;

pub use chunk::{ChunkSigner, SigningConfig};
pub use clock::{Clock, SystemClock};
pub use error::{Result, SignError};
