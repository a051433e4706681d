//! Backend readiness probing.
//!
//! The backend binds a fixed loopback port; readiness is a plain TCP connect
//! against that address. The probe is informational only: it never gates
//! window creation and never triggers a respawn.

use crate::config::BackendConfig;
use std::net::SocketAddr;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::debug;

/// Outcome of waiting for the backend to accept connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The backend accepted a TCP connection.
    Ready,
    /// The backend exited before it became reachable.
    Exited(ExitStatus),
    /// Nothing was listening within the timeout.
    TimedOut,
}

/// Wait until `addr` accepts a connection, the process exits, or `timeout`
/// lapses, probing with exponential backoff.
pub async fn wait_for_ready(
    addr: SocketAddr,
    timeout: Duration,
    mut exit: watch::Receiver<Option<ExitStatus>>,
) -> Readiness {
    let deadline = Instant::now() + timeout;
    let mut delay = BackendConfig::PROBE_INITIAL_DELAY;

    loop {
        if let Some(status) = *exit.borrow_and_update() {
            return Readiness::Exited(status);
        }

        match time::timeout(BackendConfig::PROBE_CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(_)) => return Readiness::Ready,
            Ok(Err(e)) => debug!("Connection attempt failed: {}", e),
            Err(_) => debug!("Connection attempt timed out"),
        }

        if Instant::now() >= deadline {
            return Readiness::TimedOut;
        }

        // Back off, waking early if the process exits in the meantime.
        tokio::select! {
            _ = time::sleep(delay) => {}
            changed = exit.changed() => {
                if changed.is_err() {
                    // Exit watcher is gone without a status; plain backoff.
                    time::sleep(delay).await;
                }
            }
        }

        if Instant::now() >= deadline {
            return Readiness::TimedOut;
        }

        delay = (delay * 2).min(BackendConfig::PROBE_MAX_DELAY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listening_socket_is_ready() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (_tx, rx) = watch::channel(None);

        let readiness = wait_for_ready(addr, Duration::from_secs(5), rx).await;
        assert_eq!(readiness, Readiness::Ready);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exited_process_short_circuits() {
        use std::os::unix::process::ExitStatusExt;

        let (tx, rx) = watch::channel(Some(ExitStatus::from_raw(256)));
        let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();

        let readiness = wait_for_ready(addr, Duration::from_secs(5), rx).await;
        assert!(matches!(readiness, Readiness::Exited(_)));
        drop(tx);
    }

    #[tokio::test]
    async fn test_closed_port_times_out() {
        // Bind then drop to get a port with nothing listening.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let (_tx, rx) = watch::channel(None);

        let readiness = wait_for_ready(addr, Duration::from_millis(250), rx).await;
        assert_eq!(readiness, Readiness::TimedOut);
    }
}
