//! The control loop: watch → dedupe → process, one folder at a time.

use crate::config::Config;
use crate::processor::{FolderProcessor, FolderReport};
use crate::watch::{FolderWatcher, NewFolderEvent, ProcessedSet};
use foldermonitor_common::Result;
use tokio_util::sync::CancellationToken;

/// Single-threaded folder monitor.
///
/// Folders are processed inline: a folder created while another is being
/// processed waits in the event queue until the loop polls again.
pub struct Monitor {
    watcher: FolderWatcher,
    processor: FolderProcessor,
    processed: ProcessedSet,
}

impl Monitor {
    /// Start watching the configured root. Any error here is fatal.
    pub fn new(config: &Config) -> Result<Self> {
        let watcher = FolderWatcher::new(&config.watch_root)?;
        Ok(Self::with_parts(watcher, FolderProcessor::from_config(config)))
    }

    pub fn with_parts(watcher: FolderWatcher, processor: FolderProcessor) -> Self {
        Self {
            watcher,
            processor,
            processed: ProcessedSet::new(),
        }
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// Run until `shutdown` is cancelled or the watch backend goes away.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        tracing::info!("Monitoring {:?} for new folders", self.watcher.root());

        loop {
            let batch = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                batch = self.watcher.next_batch() => batch,
            };

            let Some(batch) = batch else {
                tracing::warn!("File watcher channel closed");
                break;
            };

            for event in batch {
                if shutdown.is_cancelled() {
                    break;
                }
                self.dispatch(event, &shutdown.child_token()).await;
            }
        }

        tracing::info!(
            "Folder monitor stopped after {} folders",
            self.processed.len()
        );
        Ok(())
    }

    /// Hand one folder to the processor unless it was already handled this run.
    ///
    /// Returns `None` for a duplicate. The folder is recorded once processing
    /// returns, whatever the outcome.
    pub async fn dispatch(
        &mut self,
        event: NewFolderEvent,
        cancel: &CancellationToken,
    ) -> Option<FolderReport> {
        if self.processed.seen(&event.path) {
            tracing::debug!("Folder already processed, skipping: {:?}", event.path);
            return None;
        }

        tracing::info!("New folder detected: {:?}", event.path);
        let report = self.processor.process(&event.path, cancel).await;
        self.processed.mark_seen(event.path);

        Some(report)
    }
}
