// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

/// Convenient result alias for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Errors that can occur while loading or scrubbing an edit log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Underlying IO error while reading the log file.
    #[error("Replay log IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The log is not a well-formed ordered sequence of event records.
    #[error("Replay log format error: {0}")]
    LogFormat(String),

    /// Seek target outside `[-1, len - 1]`.
    #[error("Seek target {target} is out of range for a log of {len} events")]
    OutOfRange { target: isize, len: usize },

    /// Playback was requested with unusable options.
    #[error("Replay playback error: {0}")]
    Playback(String),
}

impl ReplayError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::LogFormat(message.into())
    }

    /// True for [`ReplayError::OutOfRange`].
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
