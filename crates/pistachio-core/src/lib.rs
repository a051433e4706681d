//! Pistachio Core - Backend supervision for the Pistachio desktop shell.
//!
//! This crate owns everything in the launcher that is not the window itself:
//! resolving the application bundle layout, spawning the Python backend
//! server, relaying its output to the console, probing it for readiness, and
//! tearing it down on shutdown.
//!
//! # Example
//!
//! ```rust,ignore
//! use pistachio_core::bundle::BundleLayout;
//! use pistachio_core::supervisor::{BackendLaunchConfig, BackendProcess};
//!
//! # async fn launch() -> pistachio_core::Result<()> {
//! let bundle = BundleLayout::detect()?;
//! let backend = BackendProcess::spawn(BackendLaunchConfig::for_bundle(&bundle)).await?;
//! println!("backend PID: {}", backend.pid());
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod config;
pub mod error;
pub mod platform;
pub mod supervisor;

// Re-export commonly used types
pub use bundle::BundleLayout;
pub use error::{LauncherError, Result};
pub use supervisor::{BackendLaunchConfig, BackendProcess, Readiness};
