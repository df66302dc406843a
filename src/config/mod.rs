mod types;

pub use types::*;

use anyhow::{Context, Result};
use foldermonitor_common::paths::normalize_extension;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse, expand and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content).context("Failed to parse config")?;

    prepare_config(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./foldermonitor.toml",
        "~/.config/foldermonitor/config.toml",
        "/etc/foldermonitor/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

fn prepare_config(config: &mut Config) {
    config.watch_root = expand(&config.watch_root);
    config.logging.directory = expand(&config.logging.directory);

    for route in config.routes.iter_mut() {
        route.extension = normalize_extension(&route.extension);
        for dest in route.destinations.iter_mut() {
            *dest = expand(dest);
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if !config.watch_root.is_dir() {
        tracing::warn!("Watch root does not exist: {:?}", config.watch_root);
    }

    let mut extensions = HashSet::new();
    for route in &config.routes {
        if route.extension.is_empty() {
            anyhow::bail!("Route has an empty extension");
        }
        if !extensions.insert(route.extension.as_str()) {
            anyhow::bail!("Extension '{}' is routed more than once", route.extension);
        }
        if route.destinations.is_empty() {
            anyhow::bail!("Route '{}' has no destinations", route.extension);
        }
        for dest in &route.destinations {
            if !dest.is_dir() {
                tracing::warn!(
                    "Destination for '{}' does not exist: {:?}",
                    route.extension,
                    dest
                );
            }
        }
    }

    if config.logging.max_bytes == 0 {
        anyhow::bail!("logging.max_bytes cannot be 0");
    }
    if config.logging.generations == 0 {
        anyhow::bail!("logging.generations cannot be 0");
    }

    Ok(())
}
