// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Logging section of the replayer configuration file

use serde::{Deserialize, Serialize};

use crate::{CliLogLevel, LogFormat};

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Logging verbosity level
    pub log_level: Option<CliLogLevel>,
    /// Output format for log messages
    pub log_format: Option<LogFormat>,
    /// Directory for log files
    pub log_dir: Option<String>,
}
