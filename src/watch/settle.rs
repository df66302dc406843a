use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How a debounce wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Interrupted,
}

/// Fixed delay that lets an in-progress download finish writing before a
/// folder is scanned.
///
/// There is no "still being written" detection: whatever is in the folder
/// once the delay elapses is what gets routed.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay: Duration,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay unless `cancel` fires first.
    pub async fn wait(&self, cancel: &CancellationToken) -> WaitOutcome {
        if cancel.is_cancelled() {
            return WaitOutcome::Interrupted;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => WaitOutcome::Interrupted,
            _ = tokio::time::sleep(self.delay) => WaitOutcome::Elapsed,
        }
    }
}
