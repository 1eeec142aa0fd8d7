//! Telemetry Frames
//!
//! Fixed-layout binary record the daemon pushes on a `Status` connection.
//!
//! # Frame Format
//!
//! ```text
//! +--------------+----------------+--------------+---------------+---------------+
//! | Memory (8)   | Goroutines (4) | Bytes In (4) | Bytes Out (4) | Traffic (1)   |
//! | i64 BE       | i32 BE         | i32 BE       | i32 BE        | 0 = false     |
//! +--------------+----------------+--------------+---------------+---------------+
//! ```
//!
//! Frames are not length-prefixed; every frame is exactly [`FRAME_SIZE`] bytes.

use std::io;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Size of one telemetry frame on the wire
pub const FRAME_SIZE: usize = 21;

const MEMORY_OFFSET: usize = 0;
const GOROUTINES_OFFSET: usize = 8;
const BYTES_IN_OFFSET: usize = 12;
const BYTES_OUT_OFFSET: usize = 16;
const TRAFFIC_OFFSET: usize = 20;

/// One decoded telemetry sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Memory in use by the daemon, in bytes
    pub memory_bytes: i64,
    /// Number of live goroutines in the daemon
    pub goroutine_count: i32,
    /// Inbound traffic counter reported by the daemon
    pub bytes_in: i32,
    /// Outbound traffic counter reported by the daemon
    pub bytes_out: i32,
    /// Whether the traffic counters are meaningful
    pub traffic_available: bool,
}

impl TelemetrySample {
    /// Decode a sample from one complete frame
    ///
    /// Any non-zero traffic byte decodes as `true`.
    #[must_use]
    pub fn decode(frame: &[u8; FRAME_SIZE]) -> Self {
        Self {
            memory_bytes: i64::from_be_bytes(field::<8>(frame, MEMORY_OFFSET)),
            goroutine_count: i32::from_be_bytes(field::<4>(frame, GOROUTINES_OFFSET)),
            bytes_in: i32::from_be_bytes(field::<4>(frame, BYTES_IN_OFFSET)),
            bytes_out: i32::from_be_bytes(field::<4>(frame, BYTES_OUT_OFFSET)),
            traffic_available: frame[TRAFFIC_OFFSET] != 0,
        }
    }

    /// Encode this sample as one frame
    #[must_use]
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let mut frame = [0u8; FRAME_SIZE];
        frame[MEMORY_OFFSET..GOROUTINES_OFFSET].copy_from_slice(&self.memory_bytes.to_be_bytes());
        frame[GOROUTINES_OFFSET..BYTES_IN_OFFSET]
            .copy_from_slice(&self.goroutine_count.to_be_bytes());
        frame[BYTES_IN_OFFSET..BYTES_OUT_OFFSET].copy_from_slice(&self.bytes_in.to_be_bytes());
        frame[BYTES_OUT_OFFSET..TRAFFIC_OFFSET].copy_from_slice(&self.bytes_out.to_be_bytes());
        frame[TRAFFIC_OFFSET] = u8::from(self.traffic_available);
        frame
    }

    /// Read exactly one frame from `reader`
    ///
    /// # Errors
    ///
    /// Returns the reader's error. A stream that ends before a full frame
    /// arrives yields `ErrorKind::UnexpectedEof`.
    pub async fn read_from<R>(reader: &mut R) -> io::Result<Self>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut frame = [0u8; FRAME_SIZE];
        reader.read_exact(&mut frame).await?;
        Ok(Self::decode(&frame))
    }

    /// Write this sample as one frame to `writer`
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        writer.write_all(&self.encode()).await
    }
}

#[inline]
fn field<const N: usize>(frame: &[u8; FRAME_SIZE], at: usize) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&frame[at..at + N]);
    buf
}
