//! Extension-based routing of downloaded files into destination directories.

use crate::config::RouteConfig;
use foldermonitor_common::paths::normalize_extension;
use foldermonitor_common::{Error, Result};
use std::path::{Path, PathBuf};

/// Fixed extension → destination directories table.
///
/// Built once from the configuration and never mutated afterwards. Lookup
/// order follows configuration order, which is also the scan order used by
/// the folder processor.
#[derive(Debug, Clone)]
pub struct DestinationMapping {
    routes: Vec<RouteConfig>,
}

impl DestinationMapping {
    pub fn new(routes: &[RouteConfig]) -> Self {
        let routes = routes
            .iter()
            .map(|r| RouteConfig {
                extension: normalize_extension(&r.extension),
                destinations: r.destinations.clone(),
            })
            .collect();
        Self { routes }
    }

    /// Configured extensions, in scan order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.extension.as_str())
    }

    /// Destinations for an extension; empty when the extension is unmapped.
    pub fn destinations_for(&self, ext: &str) -> &[PathBuf] {
        let ext = normalize_extension(ext);
        self.routes
            .iter()
            .find(|r| r.extension == ext)
            .map(|r| r.destinations.as_slice())
            .unwrap_or(&[])
    }
}

/// Copy `source` to `destination`, replacing any existing file there.
///
/// The destination directory must already exist. Both outcomes are logged
/// here; callers decide whether a failure matters.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    let result = if source.is_file() {
        std::fs::copy(source, destination).map_err(Error::from)
    } else {
        Err(Error::not_a_file(source))
    };

    match &result {
        Ok(_) => tracing::info!("Successfully copied {:?} to {:?}", source, destination),
        Err(e) => tracing::error!("Error copying {:?} to {:?}: {}", source, destination, e),
    }

    result
}
