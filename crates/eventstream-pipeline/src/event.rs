//! Mapping between modeled event values and frames (§4.D.1/§4.D.2).
//!
//! Rust has no shape-trait reflection, so the generic schema-driven dispatch
//! this would otherwise need is instead two traits an event type implements
//! by hand: [`SerializeEvent`] for the send side, [`DeserializeEvent`] for
//! the receive side.

use eventstream_wire::{HeaderValue, Headers};

use crate::{codec::PayloadCodec, error::PipelineError};

/// Reserved `:event-type` value for an operation's input envelope.
pub const INITIAL_REQUEST_EVENT_TYPE: &str = "initial-request";
/// Reserved `:event-type` value for an operation's output envelope.
pub const INITIAL_RESPONSE_EVENT_TYPE: &str = "initial-response";

/// The `:message-type` header's three legal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    /// `:message-type = "event"`.
    Event,
    /// `:message-type = "exception"`.
    Exception,
}

/// Which end of an operation a publisher is serializing for, since the
/// reserved `initial-request`/`initial-response` event type depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// This side sends operation input / receives operation output.
    Client,
    /// This side sends operation output / receives operation input.
    Server,
}

/// A payload-bound member's raw encoding, or the absence of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// The payload bytes. Empty when the event carries no payload.
    pub bytes: Vec<u8>,
    /// The `:content-type` header value to attach, if any bytes were produced.
    pub content_type: Option<&'static str>,
}

impl EncodedPayload {
    /// An event with no payload at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { bytes: Vec::new(), content_type: None }
    }
}

/// Send-side mapping of a modeled event value to a frame (§4.D.1).
pub trait SerializeEvent<C: PayloadCodec> {
    /// The union member name this event represents, or `None` if this value
    /// *is* the operation's input/output envelope (step 2 of §4.D.1).
    fn member_name(&self) -> Option<&str>;

    /// Whether this event is modeled as an operation error.
    fn is_error(&self) -> bool {
        false
    }

    /// Header values contributed by this event's `@eventHeader` members.
    fn event_headers(&self) -> Vec<(String, HeaderValue)> {
        Vec::new()
    }

    /// Encodes this event's payload-bound content (step 4 of §4.D.1).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Codec`] if the payload codec fails.
    fn encode_payload(&self, codec: &C) -> Result<EncodedPayload, PipelineError>;
}

/// Receive-side mapping of a decoded frame back to a modeled event value
/// (§4.D.2).
pub trait DeserializeEvent<C: PayloadCodec>: Sized {
    /// Builds a value from a decoded frame's parts.
    ///
    /// For `MessageClass::Exception`, a well-behaved implementation
    /// deserializes the modeled error and returns
    /// `Err(PipelineError::ModeledEventError(Box::new(err)))` rather than
    /// `Ok`, so the error surfaces as a raised failure at the
    /// [`crate::receiver::Receiver::receive`] boundary.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Codec`] if the payload codec fails, or
    /// [`PipelineError::ModeledEventError`] for a recognized modeled error.
    fn from_event(
        message_class: MessageClass,
        event_type: &str,
        headers: &Headers,
        payload: &[u8],
        codec: &C,
    ) -> Result<Self, PipelineError>;
}
