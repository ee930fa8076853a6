// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Replayer configuration file
//!
//! ```toml
//! log-level = "info"
//!
//! [playback]
//! speed = 2.0
//! max-pause-secs = 3.0
//! ```

use anyhow::{Context, Result};
use replay_core::PlaybackOptions;
use replay_logging::{CliLogLevel, LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable pointing at a directory holding `config.toml`.
pub const HOME_ENV: &str = "REPLAYER_HOME";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReplayerConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    pub log_level: Option<CliLogLevel>,
    pub log_format: Option<LogFormat>,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PlaybackConfig {
    pub speed: f64,
    pub max_pause_secs: Option<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_pause_secs: None,
        }
    }
}

impl PlaybackConfig {
    /// Playback options with command-line values taking precedence.
    pub fn options(&self, speed: Option<f64>, max_pause_secs: Option<f64>) -> Result<PlaybackOptions> {
        let max_pause = max_pause_secs
            .or(self.max_pause_secs)
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid max pause of {} seconds", secs))
            })
            .transpose()?;
        Ok(PlaybackOptions {
            speed: speed.unwrap_or(self.speed),
            max_pause,
        })
    }
}

impl ReplayerConfig {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            log_level: self.log_level,
            log_format: self.log_format,
            log_dir: self.log_dir.clone(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse replayer configuration")
    }

    /// Load the configuration from `explicit`, or from the user config path.
    ///
    /// An explicitly named file must exist. The user config file is optional
    /// and a missing one yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match user_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no user configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

/// User configuration path, honouring `REPLAYER_HOME`.
pub fn user_config_path() -> Option<PathBuf> {
    config_path_from(std::env::var_os(HOME_ENV))
}

fn config_path_from(home: Option<OsString>) -> Option<PathBuf> {
    if let Some(home) = home.filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home).join("config.toml"));
    }
    dirs::config_dir().map(|dir| dir.join("edit-replayer").join("config.toml"))
}
