//! Configuration loading and log path resolution.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use tl_core::TimeLog;

/// Log file used when nothing else names one, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "timelog.txt";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the time log.
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    ///
    /// Later layers win: defaults, the user config file, `config_path`,
    /// `TIMELOG_*` variables, then a bare `TIMELOG` variable when non-empty.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TIMELOG_"));

        // A set but empty TIMELOG falls back like an unset one.
        if std::env::var_os("TIMELOG").is_some_and(|v| !v.is_empty()) {
            figment = figment.merge(Env::raw().only(&["TIMELOG"]).map(|_| "log_path".into()));
        }

        figment.extract()
    }

    /// The log to operate on. An explicit file from the command line wins
    /// over everything configured.
    pub fn time_log(&self, file: Option<&Path>) -> TimeLog {
        TimeLog::new(file.unwrap_or(&self.log_path))
    }
}

/// Returns the platform-specific config directory for timelog.
///
/// On Linux: `~/.config/timelog`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timelog"))
}
