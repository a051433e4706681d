//! Backend process lifecycle.

use crate::bundle::BundleLayout;
use crate::config::BackendConfig;
use crate::error::{LauncherError, Result};
use crate::platform;
use crate::supervisor::relay::{self, StreamKind};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{error, info, warn};

/// Configuration for launching the backend server.
#[derive(Debug, Clone)]
pub struct BackendLaunchConfig {
    /// Path to the Python interpreter (in the bundle's venv).
    pub python_path: PathBuf,
    /// Path to the backend entry script.
    pub script_path: PathBuf,
    /// Working directory for the backend.
    pub working_dir: PathBuf,
    /// Address the backend will listen on.
    pub server_addr: SocketAddr,
    /// How long shutdown waits after the graceful signal before killing.
    pub stop_timeout: Duration,
    /// Optional file the relayed output is teed into.
    pub log_file: Option<PathBuf>,
}

impl BackendLaunchConfig {
    /// Launch configuration for a bundle, with defaults.
    pub fn for_bundle(bundle: &BundleLayout) -> Self {
        Self {
            python_path: bundle.backend_python(),
            script_path: bundle.backend_script(),
            working_dir: bundle.root().to_path_buf(),
            server_addr: BackendConfig::SERVER_ADDR,
            stop_timeout: BackendConfig::STOP_TIMEOUT,
            log_file: None,
        }
    }

    /// Set the log file path.
    pub fn with_log_file(mut self, path: impl AsRef<Path>) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the backend address to probe.
    pub fn with_server_addr(mut self, addr: SocketAddr) -> Self {
        self.server_addr = addr;
        self
    }
}

/// A spawned backend server.
///
/// Owns the relay tasks and an exit watch; the child itself lives in a
/// background task that reaps it and publishes the exit status.
#[derive(Debug)]
pub struct BackendProcess {
    pid: u32,
    server_addr: SocketAddr,
    stop_timeout: Duration,
    exit: watch::Receiver<Option<ExitStatus>>,
    relay_tasks: Vec<JoinHandle<()>>,
}

impl BackendProcess {
    /// Spawn the backend server and start relaying its output.
    ///
    /// The child is invoked as `<python> <script>` with no further arguments,
    /// inheriting the launcher's environment. It is made the leader of its
    /// own process group so [`shutdown`](Self::shutdown) can stop the whole
    /// tree.
    pub async fn spawn(config: BackendLaunchConfig) -> Result<Self> {
        if !config.python_path.exists() {
            return Err(LauncherError::LaunchFailed {
                message: format!(
                    "backend interpreter not found: {}",
                    config.python_path.display()
                ),
            });
        }
        if !config.script_path.exists() {
            return Err(LauncherError::LaunchFailed {
                message: format!(
                    "backend entry script not found: {}",
                    config.script_path.display()
                ),
            });
        }

        let tee = match &config.log_file {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| LauncherError::io_with_path(e, parent))?;
                }
                let file = std::fs::File::create(path)
                    .map_err(|e| LauncherError::io_with_path(e, path))?;
                Some(Arc::new(Mutex::new(file)))
            }
            None => None,
        };

        let mut cmd = Command::new(&config.python_path);
        cmd.arg(&config.script_path)
            .current_dir(&config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so shutdown can signal the whole tree.
        #[cfg(unix)]
        cmd.process_group(0);

        #[cfg(windows)]
        {
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
        }

        info!(
            "Launching backend server: {} {}",
            config.python_path.display(),
            config.script_path.display()
        );

        let mut child = cmd.spawn().map_err(|e| LauncherError::LaunchFailed {
            message: format!("failed to spawn backend server: {}", e),
        })?;
        let pid = child.id().ok_or_else(|| LauncherError::LaunchFailed {
            message: "backend server exited before a PID was assigned".to_string(),
        })?;
        info!("Backend server started with PID {}", pid);

        let stdout = child.stdout.take().ok_or_else(|| {
            LauncherError::Other("backend stdout was not captured".to_string())
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            LauncherError::Other("backend stderr was not captured".to_string())
        })?;

        let mut relay_tasks = Vec::with_capacity(2);
        let tee_out = tee.clone();
        relay_tasks.push(tokio::spawn(relay::relay_lines(
            stdout,
            StreamKind::Stdout,
            move |line: &str| {
                // Verbatim console passthrough; the label is part of the line.
                println!("{line}");
                if let Some(file) = &tee_out {
                    let _ = writeln!(file.lock().unwrap(), "{line}");
                }
            },
        )));
        relay_tasks.push(tokio::spawn(relay::relay_lines(
            stderr,
            StreamKind::Stderr,
            move |line: &str| {
                eprintln!("{line}");
                if let Some(file) = &tee {
                    let _ = writeln!(file.lock().unwrap(), "{line}");
                }
            },
        )));

        let (exit_tx, exit_rx) = watch::channel(None);
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    match status.code() {
                        Some(code) => info!("Backend server exited with code {}", code),
                        None => warn!("Backend server terminated by signal: {}", status),
                    }
                    let _ = exit_tx.send(Some(status));
                }
                Err(e) => error!("Failed to wait on backend server: {}", e),
            }
        });

        Ok(Self {
            pid,
            server_addr: config.server_addr,
            stop_timeout: config.stop_timeout,
            exit: exit_rx,
            relay_tasks,
        })
    }

    /// The child's process ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The address the backend is expected to listen on.
    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// A watch over the exit status (`None` while running).
    pub fn exit_watch(&self) -> watch::Receiver<Option<ExitStatus>> {
        self.exit.clone()
    }

    /// The exit status, if the backend has exited.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        *self.exit.borrow()
    }

    /// Whether the backend is still running.
    pub fn is_running(&self) -> bool {
        self.exit_status().is_none()
    }

    /// Wait for the backend to exit.
    ///
    /// Returns `None` only if the exit watcher died without reporting a
    /// status.
    pub async fn wait(&mut self) -> Option<ExitStatus> {
        loop {
            if let Some(status) = *self.exit.borrow_and_update() {
                return Some(status);
            }
            if self.exit.changed().await.is_err() {
                return *self.exit.borrow();
            }
        }
    }

    /// Stop the backend: graceful signal, bounded wait, then a forced kill.
    ///
    /// Returns `true` once the backend is down. Already-exited backends are
    /// not an error.
    pub async fn shutdown(&mut self) -> Result<bool> {
        if self.exit_status().is_some() {
            self.drain_relays().await;
            return Ok(true);
        }

        info!("Stopping backend server (PID {})", self.pid);
        platform::request_terminate(self.pid)?;
        if self.wait_with_deadline(self.stop_timeout).await.is_some() {
            self.drain_relays().await;
            return Ok(true);
        }

        warn!(
            "Backend server did not stop within {:?}, killing",
            self.stop_timeout
        );
        platform::kill_process_tree(self.pid)?;
        let stopped = self
            .wait_with_deadline(BackendConfig::KILL_TIMEOUT)
            .await
            .is_some();
        self.drain_relays().await;
        Ok(stopped)
    }

    async fn wait_with_deadline(&mut self, timeout: Duration) -> Option<ExitStatus> {
        time::timeout(timeout, self.wait()).await.ok().flatten()
    }

    /// Let the relay tasks flush whatever is still buffered in the pipes.
    async fn drain_relays(&mut self) {
        for task in self.relay_tasks.drain(..) {
            let _ = time::timeout(BackendConfig::KILL_TIMEOUT, task).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn sh_config(dir: &Path, script_body: &str) -> BackendLaunchConfig {
        let script = dir.join("backend.sh");
        std::fs::write(&script, script_body).unwrap();
        BackendLaunchConfig {
            python_path: PathBuf::from("/bin/sh"),
            script_path: script,
            working_dir: dir.to_path_buf(),
            server_addr: "127.0.0.1:1".parse().unwrap(),
            stop_timeout: Duration::from_secs(2),
            log_file: None,
        }
    }

    #[tokio::test]
    async fn test_missing_interpreter_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackendLaunchConfig {
            python_path: temp_dir.path().join("missing-python"),
            script_path: temp_dir.path().join("main.py"),
            working_dir: temp_dir.path().to_path_buf(),
            server_addr: "127.0.0.1:1".parse().unwrap(),
            stop_timeout: Duration::from_secs(2),
            log_file: None,
        };

        let err = BackendProcess::spawn(config).await.unwrap_err();
        assert!(matches!(err, LauncherError::LaunchFailed { .. }));
        assert!(err.to_string().contains("interpreter not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_script_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = sh_config(temp_dir.path(), "exit 0");
        std::fs::remove_file(&config.script_path).unwrap();
        config.script_path = temp_dir.path().join("gone.sh");

        let err = BackendProcess::spawn(config).await.unwrap_err();
        assert!(err.to_string().contains("entry script not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_is_observed() {
        let temp_dir = TempDir::new().unwrap();
        let config = sh_config(temp_dir.path(), "exit 7");

        let mut backend = BackendProcess::spawn(config).await.unwrap();
        let status = backend.wait().await.expect("exit status");

        assert_eq!(status.code(), Some(7));
        assert!(!backend.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_is_relayed_to_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("logs").join("backend.log");
        let config = sh_config(temp_dir.path(), "echo ready\necho oops 1>&2\n")
            .with_log_file(&log_file);

        let mut backend = BackendProcess::spawn(config).await.unwrap();
        backend.wait().await.expect("exit status");
        backend.drain_relays().await;

        let log = std::fs::read_to_string(&log_file).unwrap();
        assert!(log.contains("stdout: ready"), "log was: {log:?}");
        assert!(log.contains("stderr: oops"), "log was: {log:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_stops_running_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = sh_config(temp_dir.path(), "sleep 30");

        let mut backend = BackendProcess::spawn(config).await.unwrap();
        assert!(backend.is_running());

        let stopped = backend.shutdown().await.unwrap();
        assert!(stopped);
        assert!(!backend.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_after_exit_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let config = sh_config(temp_dir.path(), "exit 0");

        let mut backend = BackendProcess::spawn(config).await.unwrap();
        backend.wait().await.expect("exit status");

        assert!(backend.shutdown().await.unwrap());
    }
}
