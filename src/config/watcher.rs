//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself: editors that
//! save by writing a temp file and renaming it would otherwise detach the
//! watch after the first save.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ShieldConfig;

/// Sends every successfully reloaded, changed configuration to the server.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ShieldConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end `HttpServer::run` consumes.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ShieldConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Reloads stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let directory = watch_root(&path);
        let last_sent: Mutex<Option<ShieldConfig>> = Mutex::new(None);
        let target = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !touches_config(&event, &target) {
                    return;
                }

                let config = match load_config(&target) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(
                            path = %target.display(),
                            error = %e,
                            "Config reload rejected, keeping the live configuration"
                        );
                        return;
                    }
                };

                let mut last = last_sent
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if last.as_ref() == Some(&config) {
                    tracing::debug!(path = %target.display(), "Config unchanged, nothing to apply");
                    return;
                }
                *last = Some(config.clone());

                tracing::info!(path = %target.display(), "Config file changed, reloading");
                if update_tx.send(config).is_err() {
                    tracing::debug!("Server stopped listening for config updates");
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %path.display(), "Watching config file");
        Ok(watcher)
    }
}

fn watch_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `event` may have changed the file at `path`.
fn touches_config(event: &Event, path: &Path) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
    );
    let Some(name) = path.file_name() else {
        return false;
    };
    relevant_kind && event.paths.iter().any(|p| p.file_name() == Some(name))
}
