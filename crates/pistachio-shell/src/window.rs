//! Main window creation.
//!
//! The page gets no host bridge: no commands are registered,
//! `withGlobalTauri` is off, and the CSP in `tauri.conf.json` confines the
//! webview to its own origin plus the local backend it calls directly.

use pistachio_core::config::{AppConfig, UiConfig};
use tauri::{WebviewUrl, WebviewWindowBuilder};

/// Create the single application window over the bundled UI entry page.
pub fn create_main_window(app: &tauri::App) -> tauri::Result<tauri::WebviewWindow> {
    WebviewWindowBuilder::new(app, "main", WebviewUrl::App("index.html".into()))
        .title(AppConfig::APP_NAME)
        .inner_size(UiConfig::WINDOW_WIDTH, UiConfig::WINDOW_HEIGHT)
        .build()
}
