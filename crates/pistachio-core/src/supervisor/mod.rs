//! Backend server supervision.
//!
//! Spawns the Python backend as a child process, relays its output to the
//! launcher's console, watches for exit, probes for readiness, and stops the
//! process tree on shutdown.

mod backend;
mod health;
mod relay;

pub use backend::{BackendLaunchConfig, BackendProcess};
pub use health::{wait_for_ready, Readiness};
pub use relay::{relay_lines, StreamKind};
