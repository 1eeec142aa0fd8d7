//! Shared test fixtures: a scripted dialer and a recording handler

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::handler::ControlHandler;
use crate::telemetry::TelemetrySample;
use crate::transport::{BoxedStream, Dialer, Endpoint};

const DUPLEX_CAPACITY: usize = 4096;

/// Dialer that fails a fixed number of times, then hands out in-memory
/// connections whose daemon ends arrive on a channel
pub struct ScriptedDialer {
    failures_remaining: Mutex<u32>,
    attempt_times: Mutex<Vec<Instant>>,
    close_peer_on_dial: bool,
    peers: mpsc::UnboundedSender<DuplexStream>,
}

impl ScriptedDialer {
    /// Fail the first `failures` dials, then succeed
    pub fn failing(failures: u32) -> (Self, mpsc::UnboundedReceiver<DuplexStream>) {
        let (peers, rx) = mpsc::unbounded_channel();
        let dialer = Self {
            failures_remaining: Mutex::new(failures),
            attempt_times: Mutex::new(Vec::new()),
            close_peer_on_dial: false,
            peers,
        };
        (dialer, rx)
    }

    /// Succeed immediately but drop the daemon end, so every write fails
    pub fn closed_peer() -> Self {
        let (mut dialer, _rx) = Self::failing(0);
        dialer.close_peer_on_dial = true;
        dialer
    }

    pub fn attempts(&self) -> usize {
        self.attempt_times.lock().len()
    }

    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempt_times.lock().clone()
    }
}

#[async_trait]
impl Dialer for ScriptedDialer {
    async fn dial(&self) -> io::Result<BoxedStream> {
        let attempt = {
            let mut times = self.attempt_times.lock();
            times.push(Instant::now());
            times.len()
        };

        {
            let mut remaining = self.failures_remaining.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    format!("dial refused (attempt {attempt})"),
                ));
            }
        }

        let (client, daemon) = tokio::io::duplex(DUPLEX_CAPACITY);
        if !self.close_peer_on_dial {
            let _ = self.peers.send(daemon);
        }
        Ok(Box::new(client))
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Unix("scripted".into())
    }
}

/// Handler that records every callback
#[derive(Default)]
pub struct RecordingHandler {
    connected: AtomicUsize,
    samples: Mutex<Vec<TelemetrySample>>,
    disconnects: Mutex<Vec<io::ErrorKind>>,
}

impl RecordingHandler {
    pub fn connected(&self) -> usize {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn samples(&self) -> Vec<TelemetrySample> {
        self.samples.lock().clone()
    }

    pub fn disconnects(&self) -> Vec<io::ErrorKind> {
        self.disconnects.lock().clone()
    }
}

impl ControlHandler for RecordingHandler {
    fn on_connected(&self) {
        self.connected.fetch_add(1, Ordering::SeqCst);
    }

    fn on_disconnected(&self, error: &io::Error) {
        self.disconnects.lock().push(error.kind());
    }

    fn on_sample(&self, sample: TelemetrySample) {
        self.samples.lock().push(sample);
    }
}

/// Sample whose fields are all derived from `n`
pub fn sample(n: i32) -> TelemetrySample {
    TelemetrySample {
        memory_bytes: i64::from(n) * 1024,
        goroutine_count: n,
        bytes_in: n * 10,
        bytes_out: n * 20,
        traffic_available: n % 2 == 0,
    }
}
