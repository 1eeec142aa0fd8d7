//! Handler Contract
//!
//! Callbacks the [`crate::ControlClient`] invokes as a session progresses.
//! Every callback defaults to a no-op, so a handler only implements what it
//! cares about.
//!
//! # Ordering
//!
//! Samples are delivered synchronously from the decode loop, in the order
//! they arrived on the wire. The loop does not read frame `n + 1` until
//! [`ControlHandler::on_sample`] returns for frame `n`, so a slow handler
//! throttles decoding. Handlers that need to do real work should hand the
//! sample off, e.g. through [`ChannelHandler`].

use std::io;

use tokio::sync::mpsc;

use crate::telemetry::TelemetrySample;

/// Session callbacks supplied at client construction
pub trait ControlHandler: Send + Sync + 'static {
    /// The command was dispatched on a fresh connection
    fn on_connected(&self) {}

    /// A decode loop ended with `error`
    ///
    /// Only invoked when `notify_disconnect` is set in the client config.
    fn on_disconnected(&self, error: &io::Error) {
        let _ = error;
    }

    /// One telemetry frame was decoded
    fn on_sample(&self, sample: TelemetrySample) {
        let _ = sample;
    }
}

/// Handler that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl ControlHandler for NoopHandler {}

impl<F> ControlHandler for F
where
    F: Fn(TelemetrySample) + Send + Sync + 'static,
{
    fn on_sample(&self, sample: TelemetrySample) {
        self(sample);
    }
}

/// Session event forwarded by [`ChannelHandler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A new session started
    Connected,
    /// A telemetry sample arrived
    Sample(TelemetrySample),
    /// The decode loop ended
    Disconnected {
        /// Kind of the read error that ended the loop
        kind: io::ErrorKind,
        /// Rendered error message
        message: String,
    },
}

/// Handler that forwards every callback to an async receiver
///
/// The channel is unbounded so the decode loop never blocks on a slow
/// consumer; ordering is preserved.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<ControlEvent>,
}

impl ChannelHandler {
    /// Create a handler and the receiver its events arrive on
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ControlEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: ControlEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Control event receiver dropped");
        }
    }
}

impl ControlHandler for ChannelHandler {
    fn on_connected(&self) {
        self.forward(ControlEvent::Connected);
    }

    fn on_disconnected(&self, error: &io::Error) {
        self.forward(ControlEvent::Disconnected {
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    fn on_sample(&self, sample: TelemetrySample) {
        self.forward(ControlEvent::Sample(sample));
    }
}
