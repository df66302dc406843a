use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_watch_root")]
    pub watch_root: PathBuf,

    /// Debounce before a new folder is scanned
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,

    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Config {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_root: default_watch_root(),
            settle_delay_secs: default_settle_delay(),
            routes: default_routes(),
            logging: LogConfig::default(),
        }
    }
}

fn default_watch_root() -> PathBuf {
    PathBuf::from("/home/need/Downloads/JDownloader")
}

fn default_settle_delay() -> u64 {
    5 * 60
}

pub const MUSIC_DESTINATION: &str = "/mnt/music/Music/New/";
pub const MP3_TOCOPY_DESTINATION: &str = "/mnt/music/MP3ToCopy/";
pub const MP3_UNSORTED_DESTINATION: &str = "/mnt/music/MP3/Unsorted/";

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            extension: "mp4".to_string(),
            destinations: vec![PathBuf::from(MUSIC_DESTINATION)],
        },
        RouteConfig {
            extension: "m4a".to_string(),
            destinations: vec![
                PathBuf::from(MP3_TOCOPY_DESTINATION),
                PathBuf::from(MP3_UNSORTED_DESTINATION),
            ],
        },
    ]
}

/// One row of the destination mapping: files with `extension` are copied
/// into every directory of `destinations`, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    pub extension: String,

    pub destinations: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,

    /// Files are named `{file_stem}_{generation}.log`
    #[serde(default = "default_file_stem")]
    pub file_stem: String,

    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    #[serde(default = "default_generations")]
    pub generations: usize,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_file_stem() -> String {
    "foldermonitor".to_string()
}
fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}
fn default_generations() -> usize {
    5
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            file_stem: default_file_stem(),
            max_bytes: default_max_bytes(),
            generations: default_generations(),
        }
    }
}
