//! Platform abstraction layer for cross-platform compatibility.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here rather than
//! scattered throughout the codebase:
//! - `paths` - Platform-specific bundle paths
//! - `process` - Process liveness and termination

pub mod paths;
pub mod process;

// Re-export commonly used items
pub use paths::venv_python;
pub use process::{is_process_alive, kill_process_tree, request_terminate};

/// Returns the current platform name.
pub fn current_platform() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "unknown"
    }
}
