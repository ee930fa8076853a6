// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `play` command: timed replay of a recorded log

use anyhow::{Context, Result};
use clap::Args;
use replay_core::PlaybackPlan;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::config::PlaybackConfig;
use crate::inspect::{format_row, write_buffers};

#[derive(Args, Clone, Debug)]
pub struct PlayArgs {
    /// Recorded event log (JSON array)
    pub log: PathBuf,

    /// Start after this event (default: from the beginning)
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<isize>,

    /// Stop after this event (default: the last one)
    #[arg(long)]
    pub to: Option<usize>,

    /// Playback rate; 2 replays twice as fast
    #[arg(long)]
    pub speed: Option<f64>,

    /// Longest wait between two events, in seconds
    #[arg(long)]
    pub max_pause: Option<f64>,
}

impl PlayArgs {
    pub fn run(&self, playback: &PlaybackConfig, out: &mut impl Write) -> Result<()> {
        self.run_with(playback, out, std::thread::sleep)
    }

    /// Play with a custom wait function, printing each event as it is applied
    /// and the buffers once the last one is reached.
    pub fn run_with(
        &self,
        playback: &PlaybackConfig,
        out: &mut impl Write,
        mut wait: impl FnMut(Duration),
    ) -> Result<()> {
        let mut session = crate::open_session(&self.log)?;
        if session.log().is_empty() {
            writeln!(out, "log is empty")?;
            return Ok(());
        }

        let options = playback.options(self.speed, self.max_pause)?;
        let from = self.from.unwrap_or(-1);
        let to = self.to.unwrap_or(session.log().len() - 1);
        session
            .seek(from)
            .with_context(|| format!("cannot start playback after event {}", from))?;

        let plan = PlaybackPlan::new(session.log(), from, to, options)?;
        info!(
            from,
            to,
            steps = plan.remaining(),
            total_ms = plan.total_delay().as_millis() as u64,
            "starting playback"
        );

        let rows = session.display_rows();
        for step in plan {
            wait(step.delay);
            session.seek(step.index as isize)?;
            writeln!(out, "{}", format_row(&rows[step.index]))?;
        }

        write_buffers(&session, out)?;
        Ok(())
    }
}
