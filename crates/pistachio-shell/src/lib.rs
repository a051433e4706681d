//! Pistachio desktop shell.
//!
//! Opens the application window over the bundled UI and supervises the
//! backend server process. The UI talks to the backend directly over local
//! HTTP; the shell only relays the backend's console output and stops it
//! again on exit.

mod backend;
mod logging;
mod window;

use pistachio_core::bundle::BundleLayout;
use pistachio_core::config::AppConfig;
use pistachio_core::platform;
use tracing::{info, warn};

/// Run the launcher: spawn the backend, then hand the main thread to the
/// window event loop until the application exits.
pub fn run() -> anyhow::Result<()> {
    logging::init();
    info!(
        "Starting {} shell on {}",
        AppConfig::APP_NAME,
        platform::current_platform()
    );

    let bundle = BundleLayout::detect()?;
    info!("Bundle root: {}", bundle.root().display());

    // The backend starts immediately; the window never waits for it.
    let mut backend = backend::start(&bundle);

    tauri::Builder::default()
        .setup(|app| {
            window::create_main_window(app)?;
            Ok(())
        })
        .build(tauri::generate_context!())?
        .run(move |_app, event| match event {
            tauri::RunEvent::ExitRequested { code, api, .. } => {
                // Closing the last window requests an exit without a code;
                // macOS keeps the app alive until an explicit quit.
                if cfg!(target_os = "macos") && code.is_none() {
                    api.prevent_exit();
                }
            }
            tauri::RunEvent::Exit => {
                if let Some(backend) = backend.as_mut() {
                    match tauri::async_runtime::block_on(backend.shutdown()) {
                        Ok(true) => {}
                        Ok(false) => warn!("Backend server still running after shutdown"),
                        Err(e) => warn!("Failed to stop backend server: {}", e),
                    }
                }
            }
            _ => {}
        });

    Ok(())
}
