//! Verbatim relay of the backend's output streams.
//!
//! Each line the backend writes is forwarded to the launcher's console with
//! a literal `stdout: ` or `stderr: ` label. The labels are part of the
//! console contract, so they never go through the tracing formatter.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

/// Which of the child's output streams a relay task is draining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    /// The literal label prepended to every relayed line.
    pub fn prefix(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout: ",
            StreamKind::Stderr => "stderr: ",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// Drain `reader` line by line, handing each labeled line to `emit`.
///
/// Runs until the stream hits EOF (the child exited or closed the handle).
pub async fn relay_lines<R, F>(reader: R, kind: StreamKind, mut emit: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => emit(&format!("{}{}", kind.prefix(), line)),
            Ok(None) => break,
            Err(e) => {
                debug!("Backend {} stream closed: {}", kind, e);
                break;
            }
        }
    }
}
