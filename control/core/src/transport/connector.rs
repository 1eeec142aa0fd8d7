//! Transport Connector
//!
//! Dials the daemon with bounded linear backoff. The daemon may still be
//! starting when the client comes up, so a refused or missing socket is
//! retried a fixed number of times before giving up.

use std::io;
use std::sync::Arc;

use tracing::debug;

use super::config::RetryPolicy;
use super::traits::{BoxedStream, Dialer, Endpoint};

/// Transport-agnostic dialer with retry
#[derive(Clone)]
pub struct Connector {
    dialer: Arc<dyn Dialer>,
    retry: RetryPolicy,
}

impl Connector {
    /// Create a connector around `dialer`
    pub fn new(dialer: Arc<dyn Dialer>, retry: RetryPolicy) -> Self {
        Self { dialer, retry }
    }

    /// Endpoint of the underlying dialer
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        self.dialer.endpoint()
    }

    /// Retry policy in use
    #[must_use]
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Dial until an attempt succeeds or the policy is exhausted
    ///
    /// Returns the first successful connection immediately. Every failed
    /// attempt, including the last, is followed by its backoff delay.
    ///
    /// # Errors
    ///
    /// Returns the error from the final attempt, unchanged.
    pub async fn connect(&self) -> io::Result<BoxedStream> {
        let mut last_error = None;

        for attempt in 0..self.retry.max_attempts {
            match self.dialer.dial().await {
                Ok(stream) => {
                    debug!(endpoint = %self.dialer.endpoint(), attempt, "Dial succeeded");
                    return Ok(stream);
                }
                Err(e) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    debug!(
                        endpoint = %self.dialer.endpoint(),
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Dial failed"
                    );
                    last_error = Some(e);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "retry policy allows no dial attempts")
        }))
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("endpoint", &self.dialer.endpoint())
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedDialer;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_connect_first_attempt() {
        let (dialer, _peers) = ScriptedDialer::failing(0);
        let dialer = Arc::new(dialer);
        let connector = Connector::new(dialer.clone(), RetryPolicy::default());

        assert!(connector.connect().await.is_ok());
        assert_eq!(dialer.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_backoff_schedule() {
        for failures in 0..10u32 {
            let (dialer, _peers) = ScriptedDialer::failing(failures);
            let dialer = Arc::new(dialer);
            let connector = Connector::new(dialer.clone(), RetryPolicy::default());

            assert!(connector.connect().await.is_ok(), "failures = {failures}");

            let times = dialer.attempt_times();
            assert_eq!(times.len() as u32, failures + 1);
            for (i, pair) in times.windows(2).enumerate() {
                let gap = pair[1] - pair[0];
                let expected = Duration::from_millis(100 + 50 * i as u64);
                assert!(
                    gap >= expected && gap < expected + Duration::from_millis(5),
                    "attempt {i}: slept {gap:?}, expected {expected:?}"
                );
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_exhausted_returns_last_error() {
        let (dialer, _peers) = ScriptedDialer::failing(u32::MAX);
        let dialer = Arc::new(dialer);
        let connector = Connector::new(dialer.clone(), RetryPolicy::default());

        let start = tokio::time::Instant::now();
        let err = connector.connect().await.err().unwrap();

        assert_eq!(dialer.attempts(), 10);
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
        assert_eq!(err.to_string(), "dial refused (attempt 10)");
        assert!(start.elapsed() >= Duration::from_millis(3250));
    }

    #[tokio::test]
    async fn test_connect_zero_attempts() {
        let (dialer, _peers) = ScriptedDialer::failing(0);
        let retry = RetryPolicy {
            max_attempts: 0,
            ..Default::default()
        };
        let connector = Connector::new(Arc::new(dialer), retry);

        let err = connector.connect().await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_waits_for_late_listener() {
        use crate::transport::UnixSocketDialer;
        use tempfile::TempDir;
        use tokio::net::UnixListener;

        let temp_dir = TempDir::new().unwrap();
        let dialer = UnixSocketDialer::in_dir(temp_dir.path());
        let socket_path = dialer.socket_path().to_path_buf();
        let connector = Connector::new(Arc::new(dialer), RetryPolicy::default());

        let server = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let listener = UnixListener::bind(&socket_path).unwrap();
            listener.accept().await.map(|_| ())
        });

        assert!(connector.connect().await.is_ok());
        server.await.unwrap().unwrap();
    }
}
