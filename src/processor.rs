//! Per-folder pipeline: settle, route matching files, delete the folder.

use crate::cleanup::{delete_tree, DeleteReport};
use crate::config::Config;
use crate::route::{copy_file, DestinationMapping};
use crate::watch::{Debounce, WaitOutcome};
use foldermonitor_common::paths::{has_extension, target_in};
use foldermonitor_common::{Error, Result};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// A copy that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A copy that failed. Processing carried on regardless.
#[derive(Debug)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub error: Error,
}

/// What happened to one folder.
#[derive(Debug)]
pub enum FolderReport {
    /// The settle wait was cancelled; nothing was copied or deleted.
    Interrupted,
    Completed {
        copied: Vec<CopiedFile>,
        copy_failures: Vec<CopyFailure>,
        deletion: DeleteReport,
    },
}

impl FolderReport {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    pub fn copied(&self) -> &[CopiedFile] {
        match self {
            Self::Completed { copied, .. } => copied,
            Self::Interrupted => &[],
        }
    }

    pub fn copy_failures(&self) -> &[CopyFailure] {
        match self {
            Self::Completed { copy_failures, .. } => copy_failures,
            Self::Interrupted => &[],
        }
    }

    pub fn deletion(&self) -> Option<&DeleteReport> {
        match self {
            Self::Completed { deletion, .. } => Some(deletion),
            Self::Interrupted => None,
        }
    }
}

/// Runs the settle → route → delete pipeline for one folder at a time.
#[derive(Debug, Clone)]
pub struct FolderProcessor {
    debounce: Debounce,
    mapping: DestinationMapping,
}

impl FolderProcessor {
    pub fn new(debounce: Debounce, mapping: DestinationMapping) -> Self {
        Self { debounce, mapping }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Debounce::new(config.settle_delay()),
            DestinationMapping::new(&config.routes),
        )
    }

    /// Process a freshly created folder.
    ///
    /// Copy failures never stop the pipeline and the folder is deleted
    /// afterwards even if some copies failed. Cancelling `cancel` during the
    /// settle wait abandons the folder untouched.
    pub async fn process(&self, folder: &Path, cancel: &CancellationToken) -> FolderReport {
        tracing::info!(
            "Waiting {} seconds before processing folder: {:?}",
            self.debounce.delay().as_secs(),
            folder
        );

        if self.debounce.wait(cancel).await == WaitOutcome::Interrupted {
            tracing::error!("Wait interrupted, skipping folder: {:?}", folder);
            return FolderReport::Interrupted;
        }

        let mut copied = Vec::new();
        let mut copy_failures = Vec::new();

        for ext in self.mapping.extensions() {
            let matches = match matching_files(folder, ext) {
                Ok(matches) => matches,
                Err(e) => {
                    tracing::error!("Error scanning {:?} for .{} files: {}", folder, ext, e);
                    continue;
                }
            };

            for source in matches {
                for dest_dir in self.mapping.destinations_for(ext) {
                    let Some(destination) = target_in(dest_dir, &source) else {
                        continue;
                    };

                    match copy_file(&source, &destination) {
                        Ok(_) => copied.push(CopiedFile {
                            source: source.clone(),
                            destination,
                        }),
                        Err(error) => copy_failures.push(CopyFailure {
                            source: source.clone(),
                            destination,
                            error,
                        }),
                    }
                }
            }
        }

        let deletion = delete_tree(folder);

        tracing::debug!(
            "Finished {:?}: {} copied, {} copy failures, {} delete failures",
            folder,
            copied.len(),
            copy_failures.len(),
            deletion.failures.len()
        );

        FolderReport::Completed {
            copied,
            copy_failures,
            deletion,
        }
    }
}

/// Immediate children of `folder` with the given extension, in directory
/// enumeration order.
fn matching_files(folder: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if has_extension(&path, ext) {
            matches.push(path);
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use std::fs;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        music: PathBuf,
        tocopy: PathBuf,
        unsorted: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let root = dir.path().join("downloads");
            let music = dir.path().join("music");
            let tocopy = dir.path().join("tocopy");
            let unsorted = dir.path().join("unsorted");
            for d in [&root, &music, &tocopy, &unsorted] {
                fs::create_dir(d).unwrap();
            }
            Self {
                _dir: dir,
                root,
                music,
                tocopy,
                unsorted,
            }
        }

        fn processor(&self, delay: Duration) -> FolderProcessor {
            FolderProcessor::new(
                Debounce::new(delay),
                DestinationMapping::new(&[
                    RouteConfig {
                        extension: "mp4".to_string(),
                        destinations: vec![self.music.clone()],
                    },
                    RouteConfig {
                        extension: "m4a".to_string(),
                        destinations: vec![self.tocopy.clone(), self.unsorted.clone()],
                    },
                ]),
            )
        }

        fn folder(&self, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
            let folder = self.root.join(name);
            fs::create_dir(&folder).unwrap();
            for (file, content) in files {
                fs::write(folder.join(file), content).unwrap();
            }
            folder
        }
    }

    #[tokio::test]
    async fn test_routes_media_and_deletes_folder() {
        let fx = Fixture::new();
        let folder = fx.folder("album", &[("a.mp4", b"video"), ("b.m4a", b"audio")]);

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert!(!report.is_interrupted());
        assert_eq!(report.copied().len(), 3);
        assert!(report.copy_failures().is_empty());
        assert_eq!(fs::read(fx.music.join("a.mp4")).unwrap(), b"video");
        assert_eq!(fs::read(fx.tocopy.join("b.m4a")).unwrap(), b"audio");
        assert_eq!(fs::read(fx.unsorted.join("b.m4a")).unwrap(), b"audio");
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_unmapped_files_are_deleted_not_copied() {
        let fx = Fixture::new();
        let folder = fx.folder("misc", &[("c.txt", b"notes")]);

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert!(report.copied().is_empty());
        assert!(report.copy_failures().is_empty());
        assert!(!fx.music.join("c.txt").exists());
        assert!(!fx.tocopy.join("c.txt").exists());
        assert!(!folder.exists());
        assert!(report.deletion().unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_missing_destination_does_not_stop_pipeline() {
        let fx = Fixture::new();
        fs::remove_dir(&fx.music).unwrap();
        let folder = fx.folder("mixed", &[("a.mp4", b"video"), ("b.m4a", b"audio")]);

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        let failures = report.copy_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, folder.join("a.mp4"));
        assert_eq!(failures[0].destination, fx.music.join("a.mp4"));

        assert!(fx.tocopy.join("b.m4a").exists());
        assert!(fx.unsorted.join("b.m4a").exists());
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_existing_destination_file_is_overwritten() {
        let fx = Fixture::new();
        fs::write(fx.music.join("a.mp4"), b"stale copy from last week").unwrap();
        let folder = fx.folder("again", &[("a.mp4", b"fresh")]);

        fx.processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert_eq!(fs::read(fx.music.join("a.mp4")).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_only_immediate_children_are_routed() {
        let fx = Fixture::new();
        let folder = fx.folder("nested", &[("top.mp4", b"t")]);
        fs::create_dir(folder.join("sub")).unwrap();
        fs::write(folder.join("sub").join("deep.mp4"), b"d").unwrap();

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert_eq!(report.copied().len(), 1);
        assert!(fx.music.join("top.mp4").exists());
        assert!(!fx.music.join("deep.mp4").exists());
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_interrupted_wait_leaves_folder_alone() {
        let fx = Fixture::new();
        let processor = fx.processor(Duration::from_secs(300));
        let x = fx.folder("x", &[("a.mp4", b"x-video")]);
        let y = fx.folder("y", &[("b.m4a", b"y-audio")]);

        let cancel_x = CancellationToken::new();
        cancel_x.cancel();
        let report = processor.process(&x, &cancel_x).await;

        assert!(report.is_interrupted());
        assert!(x.join("a.mp4").exists());
        assert!(!fx.music.join("a.mp4").exists());

        let report = fx
            .processor(Duration::ZERO)
            .process(&y, &CancellationToken::new())
            .await;

        assert!(!report.is_interrupted());
        assert!(fx.tocopy.join("b.m4a").exists());
        assert!(fx.unsorted.join("b.m4a").exists());
        assert!(!y.exists());
        assert!(x.exists());
    }

    #[test]
    fn test_matching_files_filters_by_extension() {
        let fx = Fixture::new();
        let folder = fx.folder(
            "scan",
            &[
                ("a.mp4", b""),
                ("B.MP4", b""),
                (".mp4", b""),
                ("c.m4a", b""),
                ("d.mp4.part", b""),
            ],
        );

        let mut mp4 = matching_files(&folder, "mp4").unwrap();
        mp4.sort();
        assert_eq!(mp4, vec![folder.join(".mp4"), folder.join("a.mp4")]);

        assert_eq!(
            matching_files(&folder, "m4a").unwrap(),
            vec![folder.join("c.m4a")]
        );
    }

    #[tokio::test]
    async fn test_uppercase_extension_is_not_routed() {
        let fx = Fixture::new();
        let folder = fx.folder("shouting", &[("B.MP4", b"loud"), ("a.mp4", b"quiet")]);

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert_eq!(report.copied().len(), 1);
        assert!(fx.music.join("a.mp4").exists());
        assert!(!fx.music.join("B.MP4").exists());
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_unreadable_folder_counts_as_no_matches() {
        let fx = Fixture::new();
        // Replaced by a plain file between detection and scan.
        let folder = fx.root.join("replaced.mp4");
        fs::write(&folder, b"not a directory").unwrap();

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert!(!report.is_interrupted());
        assert!(report.copied().is_empty());
        assert!(report.copy_failures().is_empty());

        let deletion = report.deletion().unwrap();
        assert_eq!(deletion.deleted, vec![folder.clone()]);
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_vanished_folder_still_attempts_deletion() {
        let fx = Fixture::new();
        let folder = fx.root.join("gone");

        let report = fx
            .processor(Duration::ZERO)
            .process(&folder, &CancellationToken::new())
            .await;

        assert!(report.copied().is_empty());
        assert!(report.copy_failures().is_empty());

        let deletion = report.deletion().unwrap();
        assert!(deletion.deleted.is_empty());
        assert_eq!(deletion.failures.len(), 1);
        assert_eq!(deletion.failures[0].path, folder);
    }
}
