//! Platform-specific process control.
//!
//! The backend is spawned as the leader of its own process group, so
//! termination targets the group first and falls back to the single process
//! when the group signal fails.

// This module owns the OS process-control boundary.
#![cfg_attr(windows, allow(unsafe_code))]

use crate::error::{LauncherError, Result};
use tracing::debug;

/// Check if a process with the given PID is alive.
///
/// # Platform Behavior
/// - **Linux/macOS**: `kill(pid, 0)` signal check
/// - **Windows**: `OpenProcess` with `PROCESS_QUERY_LIMITED_INFORMATION`
pub fn is_process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        // Signal 0 (None) delivers nothing, it only checks existence.
        kill(Pid::from_raw(pid as i32), None).is_ok()
    }

    #[cfg(windows)]
    {
        use windows_sys::Win32::Foundation::CloseHandle;
        use windows_sys::Win32::System::Threading::{
            OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
        };

        // SAFETY: OpenProcess/CloseHandle on a PID we do not dereference;
        // a null handle means the process is gone or inaccessible.
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
            if !handle.is_null() {
                CloseHandle(handle);
                true
            } else {
                false
            }
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        tracing::warn!("Process alive check not implemented for this platform");
        true
    }
}

/// Ask a process tree to terminate gracefully.
///
/// A process that is already gone is not an error.
///
/// # Platform Behavior
/// - **Linux/macOS**: SIGTERM to the process group, falling back to the
///   process itself if it is not a group leader
/// - **Windows**: `taskkill /PID {pid} /T` (no force flag)
pub fn request_terminate(pid: u32) -> Result<()> {
    #[cfg(unix)]
    {
        signal_tree(pid, nix::sys::signal::Signal::SIGTERM)
    }

    #[cfg(windows)]
    {
        taskkill(pid, false)
    }

    #[cfg(not(any(unix, windows)))]
    {
        Err(LauncherError::Other(
            "Process termination not implemented for this platform".into(),
        ))
    }
}

/// Forcefully kill a process tree.
///
/// # Platform Behavior
/// - **Linux/macOS**: SIGKILL to the process group, falling back to the
///   process itself
/// - **Windows**: `taskkill /PID {pid} /F /T`
pub fn kill_process_tree(pid: u32) -> Result<()> {
    #[cfg(unix)]
    {
        signal_tree(pid, nix::sys::signal::Signal::SIGKILL)
    }

    #[cfg(windows)]
    {
        taskkill(pid, true)
    }

    #[cfg(not(any(unix, windows)))]
    {
        Err(LauncherError::Other(
            "Process termination not implemented for this platform".into(),
        ))
    }
}

#[cfg(unix)]
fn signal_tree(pid: u32, signal: nix::sys::signal::Signal) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    use tracing::warn;

    // Negative PID targets the whole process group.
    let group = Pid::from_raw(-(pid as i32));
    match kill(group, signal) {
        Ok(()) => {
            debug!("Sent {} to process group {}", signal, pid);
            return Ok(());
        }
        Err(Errno::ESRCH) => {}
        Err(e) => {
            warn!("Failed to signal process group {}: {}", pid, e);
        }
    }

    // Not a group leader (or the group is gone): signal the process itself.
    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) => {
            debug!("Sent {} to process {}", signal, pid);
            Ok(())
        }
        Err(Errno::ESRCH) => {
            debug!("Process {} is not running", pid);
            Ok(())
        }
        Err(e) => Err(LauncherError::SignalFailed {
            pid,
            message: e.to_string(),
        }),
    }
}

#[cfg(windows)]
fn taskkill(pid: u32, force: bool) -> Result<()> {
    use std::process::Command;

    let pid_arg = pid.to_string();
    let mut args = vec!["/PID", pid_arg.as_str(), "/T"];
    if force {
        args.push("/F");
    }

    let output = Command::new("taskkill")
        .args(&args)
        .output()
        .map_err(|e| LauncherError::SignalFailed {
            pid,
            message: format!("failed to run taskkill: {}", e),
        })?;

    if output.status.success() {
        debug!("taskkill succeeded for process {}", pid);
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    // "not found" errors mean the process is already dead.
    if stderr.contains("not found") || stderr.contains("not running") {
        return Ok(());
    }

    Err(LauncherError::SignalFailed {
        pid,
        message: stderr.into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_process_alive_self() {
        // Our own process should be alive
        let pid = std::process::id();
        assert!(is_process_alive(pid));
    }

    #[test]
    fn test_is_process_alive_nonexistent() {
        // A very high PID should not exist
        assert!(!is_process_alive(4_000_000_000));
    }

    #[test]
    fn test_request_terminate_nonexistent() {
        // Terminating a nonexistent process should succeed
        assert!(request_terminate(4_000_000_000).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_request_terminate_stops_child() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");

        request_terminate(child.id()).expect("signal child");

        let status = child.wait().expect("wait for child");
        assert!(!status.success());
    }
}
