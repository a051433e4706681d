//! Launcher logging.
//!
//! The launcher's own diagnostics go through tracing; the backend's relayed
//! output bypasses it and is printed verbatim (see the supervisor).

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber.
pub fn init() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}
