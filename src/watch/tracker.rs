use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Folders already handed to the processor during this run.
///
/// In-memory only: a restart forgets everything, so the guarantee is
/// at-most-once per process run. The set never shrinks.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    seen: HashSet<PathBuf>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    /// Record a folder; returns `false` if it was already recorded.
    pub fn mark_seen(&mut self, path: impl Into<PathBuf>) -> bool {
        self.seen.insert(path.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
