// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

pub mod config;
pub mod inspect;
pub mod play;

pub use clap::{Parser, Subcommand};
pub use replay_logging::CliLoggingArgs;

use anyhow::{Context, Result};
use replay_core::ReplaySession;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "replayer")]
#[command(about = "Scrub through recorded editor sessions")]
#[command(version, author)]
pub struct Cli {
    /// Configuration file (default: $REPLAYER_HOME/config.toml or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the events of a log with their pauses
    Events(inspect::EventsArgs),
    /// Show buffer contents after a given event
    Show(inspect::ShowArgs),
    /// Replay a log in real time
    Play(play::PlayArgs),
}

/// Load `path` into a fresh session, rewound.
pub(crate) fn open_session(path: &Path) -> Result<ReplaySession> {
    let mut session = ReplaySession::new();
    session
        .load_log(path)
        .with_context(|| format!("Failed to load event log {}", path.display()))?;
    Ok(session)
}
