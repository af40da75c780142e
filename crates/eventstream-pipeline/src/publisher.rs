//! Serializing modeled events to frames and writing them to a sink
//! (§4.D.1, §4.D.3, §4.D.4).

use std::marker::PhantomData;

use eventstream_sign::ChunkSigner;
use eventstream_wire::{Frame, HeaderValue, Headers};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    codec::PayloadCodec,
    error::{PipelineError, Result},
    event::{INITIAL_REQUEST_EVENT_TYPE, INITIAL_RESPONSE_EVENT_TYPE, SerializeEvent, StreamMode},
};

/// Serializes modeled events of type `E` to frames and writes them to `W`.
///
/// `send` is a single cooperative step (serialize, sign if configured,
/// write) with no overlap between calls: the frames a publisher emits
/// preserve `send` order. Not safe for concurrent use from multiple tasks;
/// pin one publisher to one task, per §5.
pub struct Publisher<E, W, C> {
    sink: W,
    codec: C,
    mode: StreamMode,
    signer: Option<ChunkSigner>,
    closed: bool,
    _event: PhantomData<fn(&E)>,
}

impl<E, W, C> Publisher<E, W, C>
where
    W: AsyncWrite + Unpin + Send,
    C: PayloadCodec,
    E: SerializeEvent<C>,
{
    /// Builds an unsigned publisher.
    pub fn new(sink: W, codec: C, mode: StreamMode) -> Self {
        Self { sink, codec, mode, signer: None, closed: false, _event: PhantomData }
    }

    /// Builds a publisher that chunk-signs every frame it emits (§4.D.4).
    pub fn with_signer(sink: W, codec: C, mode: StreamMode, signer: ChunkSigner) -> Self {
        Self { sink, codec, mode, signer: Some(signer), closed: false, _event: PhantomData }
    }

    /// Whether this publisher has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Serializes, optionally signs, and writes one event (§4.D.1).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Closed`] if this publisher is already
    /// closed, a codec/header error from serialization, or
    /// [`PipelineError::Io`] if the sink write fails — in which case this
    /// publisher transitions to closed.
    pub async fn send(&mut self, event: &E) -> Result<()> {
        if self.closed {
            return Err(PipelineError::Closed);
        }

        let frame_bytes = self.encode_frame(event)?;
        let outgoing = match &mut self.signer {
            Some(signer) => {
                let sign_headers = signer.sign_chunk(&frame_bytes)?;
                Frame::new(sign_headers, frame_bytes).encode()?
            },
            None => frame_bytes,
        };

        if let Err(err) = self.sink.write_all(&outgoing).await {
            self.closed = true;
            tracing::debug!(error = %err, "closing publisher after a failed write");
            return Err(PipelineError::Io(err));
        }
        Ok(())
    }

    fn encode_frame(&self, event: &E) -> Result<Vec<u8>> {
        let mut headers = Headers::new();

        if event.is_error() {
            headers.insert(":message-type", HeaderValue::string("exception")?)?;
            let member = event
                .member_name()
                .ok_or(PipelineError::MissingHeader(":exception-type"))?;
            headers.insert(":exception-type", HeaderValue::string(member)?)?;
        } else {
            headers.insert(":message-type", HeaderValue::string("event")?)?;
            let event_type = match event.member_name() {
                Some(name) => name.to_string(),
                None => match self.mode {
                    StreamMode::Client => INITIAL_REQUEST_EVENT_TYPE.to_string(),
                    StreamMode::Server => INITIAL_RESPONSE_EVENT_TYPE.to_string(),
                },
            };
            headers.insert(":event-type", HeaderValue::string(event_type)?)?;
        }

        for (name, value) in event.event_headers() {
            headers.insert(name, value)?;
        }

        let payload = event.encode_payload(&self.codec)?;
        if !payload.bytes.is_empty() {
            if let Some(content_type) = payload.content_type {
                headers.insert(":content-type", HeaderValue::string(content_type)?)?;
            }
        }

        Ok(Frame::new(headers, payload.bytes).encode()?)
    }

    /// Closes this publisher, emitting the signed end-of-stream sentinel
    /// first if this publisher was built with a signer (§4.D.4 step 3).
    ///
    /// A no-op if already closed. After this call, `send` returns
    /// [`PipelineError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the sentinel write or sink shutdown
    /// fails.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        if let Some(signer) = &mut self.signer {
            let sign_headers = signer.sign_chunk(&[])?;
            let sentinel = Frame::new(sign_headers, Vec::new()).encode()?;
            self.sink.write_all(&sentinel).await?;
        }

        self.closed = true;
        tracing::debug!("publisher closed");
        self.sink.shutdown().await?;
        Ok(())
    }

    /// Returns the wrapped sink, consuming this publisher without closing it.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
