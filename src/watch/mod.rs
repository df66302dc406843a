pub mod settle;
pub mod tracker;

pub use settle::{Debounce, WaitOutcome};
pub use tracker::ProcessedSet;

use foldermonitor_common::{Error, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A directory that appeared directly under the watch root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewFolderEvent {
    pub path: PathBuf,
}

/// Watches one root directory (non-recursively) for newly created folders.
///
/// Each watcher is a fresh subscription: events that happened before
/// [`FolderWatcher::new`] returned are never replayed.
pub struct FolderWatcher {
    root: PathBuf,
    event_rx: mpsc::Receiver<PathBuf>,
    // Dropping the backend ends the subscription.
    _watcher: RecommendedWatcher,
}

impl FolderWatcher {
    /// Register interest in entries created under `root`.
    ///
    /// Fails if `root` is not an existing directory or the OS watch service
    /// refuses the registration.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::not_a_directory(root));
        }

        let (event_tx, event_rx) = mpsc::channel::<PathBuf>(EVENT_CHANNEL_CAPACITY);

        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let Some(path) = created_path(&event) {
                        let _ = event_tx.blocking_send(path);
                    }
                }
                Err(e) => tracing::warn!("File watcher error: {}", e),
            },
            Config::default(),
        )
        .map_err(|e| Error::watch(format!("failed to create file watcher: {e}")))?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|e| Error::watch(format!("failed to watch {}: {e}", root.display())))?;

        tracing::info!("Watching directory: {:?}", root);

        Ok(Self {
            root,
            event_rx,
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait for at least one event, then drain everything already queued.
    ///
    /// Only paths that are directories at drain time are returned, so the
    /// batch may be empty. Returns `None` once the backend has shut down.
    pub async fn next_batch(&mut self) -> Option<Vec<NewFolderEvent>> {
        let first = self.event_rx.recv().await?;

        let mut paths = vec![first];
        while let Ok(path) = self.event_rx.try_recv() {
            paths.push(path);
        }

        let batch = paths
            .into_iter()
            .filter(|path| {
                let is_dir = path.is_dir();
                if !is_dir {
                    tracing::debug!("Ignoring non-directory entry: {:?}", path);
                }
                is_dir
            })
            .map(|path| NewFolderEvent { path })
            .collect();

        Some(batch)
    }
}

/// Extract the new entry from a create or move-into event.
fn created_path(event: &Event) -> Option<PathBuf> {
    match event.kind {
        EventKind::Create(_) => event.paths.first().cloned(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.first().cloned(),
        // Both carries [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.last().cloned(),
        _ => None,
    }
}
