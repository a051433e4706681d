//! Application bundle layout.
//!
//! The launcher ships next to three fixed artifacts: the backend's virtual
//! environment (`.venv`), the backend entry script (`main.py`), and the
//! prebuilt UI bundle (`dist/pistachio-ui/browser`). All of them are resolved
//! relative to the launcher's own directory, never the working directory at
//! launch time.

use crate::config::PathsConfig;
use crate::error::{LauncherError, Result};
use crate::platform;
use std::path::{Path, PathBuf};

/// Resolved locations of the bundle artifacts.
#[derive(Debug, Clone)]
pub struct BundleLayout {
    root: PathBuf,
}

impl BundleLayout {
    /// Locate the bundle relative to the running executable.
    ///
    /// Development builds run from `target/<profile>`, so the nearest
    /// ancestor of the executable that contains the backend entry script
    /// wins; failing that, the executable's own directory is the root.
    pub fn detect() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| LauncherError::Io {
            message: "resolve current executable".to_string(),
            path: None,
            source: Some(e),
        })?;
        let exe_dir = exe.parent().ok_or_else(|| LauncherError::Config {
            message: format!("executable has no parent directory: {}", exe.display()),
        })?;

        Ok(Self {
            root: locate_root(exe_dir),
        })
    }

    /// Use an explicit bundle root.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bundle root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The virtual-environment Python interpreter for the backend.
    pub fn backend_python(&self) -> PathBuf {
        platform::venv_python(&self.root)
    }

    /// The backend entry script.
    pub fn backend_script(&self) -> PathBuf {
        self.root.join(PathsConfig::BACKEND_ENTRY_FILENAME)
    }

    /// The UI bundle's entry HTML file.
    pub fn ui_index(&self) -> PathBuf {
        self.root
            .join(PathsConfig::UI_DIST_DIR_NAME)
            .join(PathsConfig::UI_BUNDLE_DIR_NAME)
            .join(PathsConfig::UI_BROWSER_DIR_NAME)
            .join(PathsConfig::UI_ENTRY_FILENAME)
    }

    /// Directory for launch log files.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(PathsConfig::LOGS_DIR_NAME)
    }
}

/// Walk up from `exe_dir` to the nearest directory containing the backend
/// entry script.
fn locate_root(exe_dir: &Path) -> PathBuf {
    exe_dir
        .ancestors()
        .find(|dir| dir.join(PathsConfig::BACKEND_ENTRY_FILENAME).exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| exe_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accessors_follow_root() {
        let layout = BundleLayout::at("/opt/pistachio");

        assert_eq!(layout.root(), Path::new("/opt/pistachio"));
        assert_eq!(
            layout.backend_script(),
            PathBuf::from("/opt/pistachio/main.py")
        );
        assert!(layout.ui_index().ends_with("dist/pistachio-ui/browser/index.html"));
        assert!(layout.logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_backend_python_is_in_venv() {
        let layout = BundleLayout::at("/opt/pistachio");
        let python = layout.backend_python();

        assert!(python.starts_with("/opt/pistachio/.venv"));
    }

    #[test]
    fn test_locate_root_prefers_script_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("main.py"), "").unwrap();

        let nested = root.join("target").join("debug");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(locate_root(&nested), root);
    }

    #[test]
    fn test_locate_root_falls_back_to_exe_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("target").join("debug");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(locate_root(&nested), nested);
    }
}
