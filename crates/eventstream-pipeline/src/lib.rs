//! Bridging modeled events to `application/vnd.amazon.eventstream` frames
//! and back: [`Publisher`] (serialize + optional chunk-sign + write) and
//! [`Receiver`] (read + deserialize + dispatch), paired as [`EventDuplex`].
//!
//! Built on `eventstream-wire` for the wire codec and `eventstream-sign` for
//! the optional SigV4 chunk-signing mode (§4.D.4).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod duplex;
mod error;
mod event;
mod publisher;
mod receiver;

pub use codec::{JsonPayloadCodec, PayloadCodec};
pub use duplex::EventDuplex;
pub use error::{PipelineError, Result};
pub use event::{
    DeserializeEvent, EncodedPayload, INITIAL_REQUEST_EVENT_TYPE, INITIAL_RESPONSE_EVENT_TYPE,
    MessageClass, SerializeEvent, StreamMode,
};
pub use publisher::Publisher;
pub use receiver::Receiver;
