//! Centralized configuration for the Pistachio launcher.
//!
//! The launcher takes no CLI flags, environment variables, or config files;
//! everything it needs is a fixed constant of the application bundle.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Pistachio";
}

/// Window dimensions.
pub struct UiConfig;

impl UiConfig {
    pub const WINDOW_WIDTH: f64 = 1600.0;
    pub const WINDOW_HEIGHT: f64 = 900.0;
}

/// Backend server parameters.
///
/// The Flask backend binds a fixed local port; the UI talks to it directly
/// over HTTP, the launcher only probes the socket for readiness.
pub struct BackendConfig;

impl BackendConfig {
    pub const SERVER_PORT: u16 = 5000;
    pub const SERVER_ADDR: SocketAddr =
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Self::SERVER_PORT);

    // Readiness probe
    pub const READY_TIMEOUT: Duration = Duration::from_secs(30);
    pub const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
    pub const PROBE_INITIAL_DELAY: Duration = Duration::from_millis(500);
    pub const PROBE_MAX_DELAY: Duration = Duration::from_secs(5);

    // Shutdown
    pub const STOP_TIMEOUT: Duration = Duration::from_secs(2);
    pub const KILL_TIMEOUT: Duration = Duration::from_secs(1);
}

/// Bundle directory and file names.
pub struct PathsConfig;

impl PathsConfig {
    pub const VENV_DIR_NAME: &'static str = ".venv";
    pub const BACKEND_ENTRY_FILENAME: &'static str = "main.py";
    pub const UI_DIST_DIR_NAME: &'static str = "dist";
    pub const UI_BUNDLE_DIR_NAME: &'static str = "pistachio-ui";
    pub const UI_BROWSER_DIR_NAME: &'static str = "browser";
    pub const UI_ENTRY_FILENAME: &'static str = "index.html";
    pub const LOGS_DIR_NAME: &'static str = "logs";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_dimensions() {
        assert_eq!(UiConfig::WINDOW_WIDTH, 1600.0);
        assert_eq!(UiConfig::WINDOW_HEIGHT, 900.0);
    }

    #[test]
    fn test_server_addr_is_loopback() {
        assert!(BackendConfig::SERVER_ADDR.ip().is_loopback());
        assert_eq!(BackendConfig::SERVER_ADDR.port(), 5000);
    }

    #[test]
    fn test_timeouts_are_reasonable() {
        assert!(BackendConfig::READY_TIMEOUT > BackendConfig::PROBE_MAX_DELAY);
        assert!(BackendConfig::STOP_TIMEOUT > Duration::ZERO);
    }
}
