//! Pairing a [`Publisher`] and [`Receiver`] bound to the same transport
//! (§4.D.7), so closing one side does not leave the other dangling.

use crate::{error::Result, publisher::Publisher, receiver::Receiver};

/// A `Publisher<E>`/`Receiver<E>` pair bound to one transport.
///
/// Additive composition over [`Publisher`]/[`Receiver`], not a new wire
/// behavior: `close` simply closes both halves in turn.
pub struct EventDuplex<E, W, R, C> {
    /// The send half.
    pub publisher: Publisher<E, W, C>,
    /// The receive half.
    pub receiver: Receiver<E, R, C>,
}

impl<E, W, R, C> EventDuplex<E, W, R, C>
where
    W: tokio::io::AsyncWrite + Unpin + Send,
    R: tokio::io::AsyncRead + Unpin + Send,
    C: crate::codec::PayloadCodec,
    E: crate::event::SerializeEvent<C> + crate::event::DeserializeEvent<C>,
{
    /// Pairs an already-constructed publisher and receiver.
    #[must_use]
    pub fn new(publisher: Publisher<E, W, C>, receiver: Receiver<E, R, C>) -> Self {
        Self { publisher, receiver }
    }

    /// Closes both halves. The receiver is closed even if closing the
    /// publisher fails, so a send-side I/O failure never leaves the
    /// receive side dangling.
    ///
    /// # Errors
    ///
    /// Returns the publisher's close error, if any, after the receiver has
    /// already been marked closed.
    pub async fn close(&mut self) -> Result<()> {
        let publisher_result = self.publisher.close().await;
        self.receiver.close();
        publisher_result
    }

    /// Splits into owned halves, e.g. to move each onto its own task.
    #[must_use]
    pub fn into_parts(self) -> (Publisher<E, W, C>, Receiver<E, R, C>) {
        (self.publisher, self.receiver)
    }

    /// Borrows both halves mutably, for interleaved single-task use.
    pub fn split(&mut self) -> (&mut Publisher<E, W, C>, &mut Receiver<E, R, C>) {
        (&mut self.publisher, &mut self.receiver)
    }
}
