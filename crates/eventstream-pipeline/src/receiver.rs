//! Reading frames from a source and deserializing them into modeled events
//! (§4.D.2, §4.D.3, §4.D.6).

use std::marker::PhantomData;

use eventstream_wire::AsyncFrameReader;
use tokio::io::AsyncRead;

use crate::{
    codec::PayloadCodec,
    error::{PipelineError, Result},
    event::{DeserializeEvent, MessageClass},
};

/// Reads frames from `R` and deserializes them into modeled events of type
/// `E`. Not safe for concurrent use from multiple tasks, per §5.
pub struct Receiver<E, R, C> {
    reader: AsyncFrameReader<R>,
    codec: C,
    closed: bool,
    _event: PhantomData<fn() -> E>,
}

impl<E, R, C> Receiver<E, R, C>
where
    R: AsyncRead + Unpin + Send,
    C: PayloadCodec,
    E: DeserializeEvent<C>,
{
    /// Wraps a byte source, reading events decoded with `codec`.
    pub fn new(source: R, codec: C) -> Self {
        Self { reader: AsyncFrameReader::new(source), codec, closed: false, _event: PhantomData }
    }

    /// Whether this receiver has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the next event, `None` at a clean end-of-stream boundary, or
    /// raises a decode/modeled-error failure (§4.D.5).
    ///
    /// Calling `receive` on an already-closed receiver returns `None`
    /// immediately without touching the source.
    ///
    /// # Errors
    ///
    /// A wire-level decode failure closes this receiver and returns
    /// [`PipelineError::Wire`]. A modeled/unmodeled service error or a
    /// payload-codec failure is returned without closing the receiver.
    pub async fn receive(&mut self) -> Result<Option<E>> {
        if self.closed {
            return Ok(None);
        }

        let frame = match self.reader.read_one().await {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.closed = true;
                tracing::warn!(error = %err, "closing receiver after a wire decode failure");
                return Err(PipelineError::Wire(err));
            },
        };

        let message_type = frame
            .headers
            .get_str(":message-type")
            .ok_or(PipelineError::MissingHeader(":message-type"))?;

        match message_type {
            "event" => {
                let event_type = frame
                    .headers
                    .get_str(":event-type")
                    .ok_or(PipelineError::MissingHeader(":event-type"))?;
                E::from_event(MessageClass::Event, event_type, &frame.headers, &frame.payload, &self.codec)
                    .map(Some)
            },
            "exception" => {
                let exception_type = frame
                    .headers
                    .get_str(":exception-type")
                    .ok_or(PipelineError::MissingHeader(":exception-type"))?;
                E::from_event(MessageClass::Exception, exception_type, &frame.headers, &frame.payload, &self.codec)
                    .map(Some)
            },
            "error" => {
                let code = frame
                    .headers
                    .get_str(":error-code")
                    .ok_or(PipelineError::MissingHeader(":error-code"))?
                    .to_string();
                let message = frame
                    .headers
                    .get_str(":error-message")
                    .ok_or(PipelineError::MissingHeader(":error-message"))?
                    .to_string();
                tracing::warn!(
                    message_type, payload_length = frame.payload.len(), %code,
                    "rejecting an unmodeled error frame, receiver stays open"
                );
                Err(PipelineError::UnmodeledEventError { code, message })
            },
            other => {
                tracing::warn!(
                    message_type = other, payload_length = frame.payload.len(),
                    "rejecting a frame with an unrecognized message type, receiver stays open"
                );
                Err(PipelineError::UnknownMessageType(other.to_string()))
            },
        }
    }

    /// Reads one event and requires it to be the operation's
    /// `"initial-response"` envelope, converting a clean terminal sentinel
    /// into [`PipelineError::MissingInitialResponse`] (§4.D.6).
    ///
    /// # Errors
    ///
    /// See [`Receiver::receive`], plus [`PipelineError::MissingInitialResponse`]
    /// if the stream ends before any frame arrives.
    pub async fn receive_initial_response(&mut self) -> Result<E> {
        match self.receive().await? {
            Some(event) => Ok(event),
            None => Err(PipelineError::MissingInitialResponse),
        }
    }

    /// Marks this receiver closed. A no-op if already closed.
    ///
    /// `AsyncRead` exposes no close operation of its own, so this only
    /// updates local state; subsequent `receive` calls return `None`
    /// without touching the source.
    pub fn close(&mut self) {
        if !self.closed {
            tracing::debug!("receiver closed");
        }
        self.closed = true;
    }

    /// Returns the wrapped source, consuming this receiver.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
