//! Path utilities for matching files by extension.
//!
//! Matching behaves like the shell glob `*.ext`: the file name must end in
//! `.ext`, compared byte for byte. `"mp4"` and `".mp4"` name the same route,
//! `"MP4"` does not.

use std::path::{Path, PathBuf};

/// Normalize an extension by stripping surrounding whitespace and the
/// leading dot. Case is preserved.
///
/// # Examples
///
/// ```
/// use foldermonitor_common::paths::normalize_extension;
///
/// assert_eq!(normalize_extension(".mp4"), "mp4");
/// assert_eq!(normalize_extension("M4A"), "M4A");
/// ```
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

/// Check if a path's file name ends in `.{ext}`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use foldermonitor_common::paths::has_extension;
///
/// assert!(has_extension(Path::new("/downloads/a/song.m4a"), "m4a"));
/// assert!(has_extension(Path::new("clip.mp4"), ".mp4"));
/// assert!(!has_extension(Path::new("clip.MP4"), "mp4"));
/// assert!(!has_extension(Path::new("notes.txt"), "mp4"));
/// ```
pub fn has_extension(path: &Path, ext: &str) -> bool {
    let suffix = format!(".{}", normalize_extension(ext));
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(&suffix))
        .unwrap_or(false)
}

/// Resolve the target path for `source` inside `destination_dir`.
///
/// Returns `None` when `source` has no file name (e.g. `/` or `..`).
pub fn target_in(destination_dir: &Path, source: &Path) -> Option<PathBuf> {
    source.file_name().map(|name| destination_dir.join(name))
}
