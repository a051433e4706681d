//! Backend supervisor wiring.

use chrono::Local;
use pistachio_core::bundle::BundleLayout;
use pistachio_core::config::BackendConfig;
use pistachio_core::supervisor::{wait_for_ready, BackendLaunchConfig, BackendProcess, Readiness};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Spawn the backend server and kick off the readiness probe.
///
/// A failed launch is logged and swallowed: the window opens regardless and
/// the UI surfaces the missing backend itself.
pub fn start(bundle: &BundleLayout) -> Option<BackendProcess> {
    let config = BackendLaunchConfig::for_bundle(bundle).with_log_file(launch_log_path(bundle));

    match tauri::async_runtime::block_on(BackendProcess::spawn(config)) {
        Ok(backend) => {
            spawn_readiness_probe(&backend);
            Some(backend)
        }
        Err(e) => {
            error!("Failed to launch backend server: {}", e);
            None
        }
    }
}

/// Log when the backend becomes reachable. Informational only; nothing is
/// retried and the window is never gated on the outcome.
fn spawn_readiness_probe(backend: &BackendProcess) {
    let addr = backend.server_addr();
    let exit = backend.exit_watch();
    tauri::async_runtime::spawn(async move {
        match wait_for_ready(addr, BackendConfig::READY_TIMEOUT, exit).await {
            Readiness::Ready => info!("Backend server ready at {}", addr),
            Readiness::Exited(status) => {
                warn!("Backend server exited before becoming ready: {}", status)
            }
            Readiness::TimedOut => warn!(
                "Backend server not reachable at {} after {:?}",
                addr,
                BackendConfig::READY_TIMEOUT
            ),
        }
    });
}

fn launch_log_path(bundle: &BundleLayout) -> PathBuf {
    bundle.logs_dir().join(format!(
        "backend-{}.log",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}
