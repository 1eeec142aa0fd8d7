//! Status Decode Loop
//!
//! Reads telemetry frames off a `Status` connection and hands each one to
//! the handler. The loop owns its connection outright: nothing else reads
//! from it, and it is dropped (closing the socket) when the loop ends or is
//! aborted.
//!
//! The first read error ends the loop. That includes a clean close by the
//! daemon and a frame cut short mid-way. No retry happens, and the handler
//! only hears about it when `notify_disconnect` is set.

use std::io;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};

use crate::handler::ControlHandler;
use crate::telemetry::TelemetrySample;
use crate::transport::BoxedStream;

/// How a decode loop ended
#[derive(Debug)]
pub struct LoopExit {
    /// Frames delivered to the handler
    pub frames: u64,
    /// Read error that ended the loop
    pub error: io::Error,
}

/// Decode frames from `reader` until a read fails
///
/// Each frame is passed to `handler.on_sample` before the next read starts.
pub async fn run_status_loop<R, H>(reader: &mut R, handler: &H, notify_disconnect: bool) -> LoopExit
where
    R: AsyncRead + Unpin + ?Sized,
    H: ControlHandler + ?Sized,
{
    let mut frames = 0u64;

    let error = loop {
        match TelemetrySample::read_from(&mut *reader).await {
            Ok(sample) => {
                handler.on_sample(sample);
                frames += 1;
            }
            Err(e) => break e,
        }
    };

    if notify_disconnect {
        handler.on_disconnected(&error);
    }

    LoopExit { frames, error }
}

/// Spawn a decode loop that takes ownership of `stream`
pub(crate) fn spawn_status_loop<H>(
    mut stream: BoxedStream,
    handler: Arc<H>,
    notify_disconnect: bool,
    session: u64,
) -> JoinHandle<()>
where
    H: ControlHandler,
{
    let span = tracing::debug_span!("status_loop", session);
    tokio::spawn(
        async move {
            let exit = run_status_loop(&mut stream, handler.as_ref(), notify_disconnect).await;
            debug!(frames = exit.frames, error = %exit.error, "Status loop ended");
        }
        .instrument(span),
    )
}
