//! Post-order removal of a processed download folder.

use foldermonitor_common::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A single entry that could not be removed.
#[derive(Debug)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of [`delete_tree`].
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Removed paths, in removal order.
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<DeleteFailure>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Remove `folder` and everything below it, children before parents.
///
/// Best effort: a failing entry is logged and recorded, and the walk moves
/// on. Symlinks, including a symlinked `folder` itself, are removed as links
/// and never followed.
pub fn delete_tree(folder: &Path) -> DeleteReport {
    delete_tree_with(folder, |path, is_dir| {
        if is_dir {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    })
}

fn delete_tree_with<F>(folder: &Path, mut remove: F) -> DeleteReport
where
    F: FnMut(&Path, bool) -> std::io::Result<()>,
{
    let mut report = DeleteReport::default();

    let walker = WalkDir::new(folder)
        .contents_first(true)
        .follow_root_links(false);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| folder.to_path_buf());
                tracing::error!("Error deleting folder {:?}: {}", path, e);
                let error = match e.into_io_error() {
                    Some(io) => Error::Io(io),
                    None => Error::Io(std::io::Error::other("filesystem loop")),
                };
                report.failures.push(DeleteFailure { path, error });
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        match remove(path, is_dir) {
            Ok(()) => {
                if is_dir {
                    tracing::info!("Deleted directory: {:?}", path);
                } else {
                    tracing::info!("Deleted file: {:?}", path);
                }
                report.deleted.push(path.to_path_buf());
            }
            Err(e) => {
                tracing::error!("Error deleting {:?}: {}", path, e);
                report.failures.push(DeleteFailure {
                    path: path.to_path_buf(),
                    error: Error::Io(e),
                });
            }
        }
    }

    report
}
