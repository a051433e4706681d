//! Platform-specific path utilities.

use crate::config::PathsConfig;
use std::path::{Path, PathBuf};

/// Get the path to the Python executable within the bundle's virtual
/// environment.
///
/// # Platform Behavior
/// - **Linux/macOS**: `{base}/.venv/bin/python`
/// - **Windows**: `{base}/.venv/Scripts/python.exe`
pub fn venv_python(base: &Path) -> PathBuf {
    #[cfg(unix)]
    {
        base.join(PathsConfig::VENV_DIR_NAME)
            .join("bin")
            .join("python")
    }
    #[cfg(windows)]
    {
        base.join(PathsConfig::VENV_DIR_NAME)
            .join("Scripts")
            .join("python.exe")
    }
}
