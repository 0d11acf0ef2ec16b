//! Layered configuration for the `clock` binary.
//!
//! Later layers win: built-in defaults, then `config.toml` in the platform
//! config directory, then a `--config` file, then `CLOCK_*` variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Settings that can come from files or the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the attendance records JSON file.
    pub records_path: PathBuf,

    /// Sessions credited less than this many minutes earn no double time.
    pub double_time_min_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_default();
        Self {
            records_path: data_dir.join("attendance.json"),
            double_time_min_minutes: 1,
        }
    }
}

impl Config {
    /// Merges every layer, with `config_path` above the platform file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large; config loads once before any command runs"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Missing files are skipped by figment
        if let Some(dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(dir.join("config.toml")));
        }
        if let Some(file) = config_path {
            figment = figment.merge(Toml::file(file));
        }

        // CLOCK_RECORDS_PATH, CLOCK_DOUBLE_TIME_MIN_MINUTES
        figment = figment.merge(Env::prefixed("CLOCK_"));

        figment.extract()
    }
}

/// `~/.config/clock` on Linux.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clock"))
}

/// Where the records file lives by default (`~/.local/share/clock` on Linux).
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("clock"))
}
