// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `events` and `show` commands

use anyhow::{Result, bail};
use clap::Args;
use replay_core::{DisplayRow, DocumentId, ReplaySession};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct EventsArgs {
    /// Recorded event log (JSON array)
    pub log: PathBuf,
}

impl EventsArgs {
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let session = crate::open_session(&self.log)?;
        for row in session.display_rows() {
            writeln!(out, "{}", format_row(&row))?;
        }
        Ok(())
    }
}

pub fn format_row(row: &DisplayRow) -> String {
    format!(
        "{:>5} {:>5}  {}  {}",
        row.index, row.pause, row.time, row.description
    )
}

#[derive(Args, Clone, Debug)]
pub struct ShowArgs {
    /// Recorded event log (JSON array)
    pub log: PathBuf,

    /// Last applied event; -1 shows the empty starting state
    #[arg(long, allow_hyphen_values = true)]
    pub at: isize,

    /// Only print this editor document
    #[arg(long, conflicts_with = "shell")]
    pub document: Option<String>,

    /// Only print the shell
    #[arg(long)]
    pub shell: bool,
}

impl ShowArgs {
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let mut session = crate::open_session(&self.log)?;
        session.seek(self.at)?;

        if self.shell {
            return write_shell(&session, out);
        }
        if let Some(id) = &self.document {
            let id = DocumentId::new(id.as_str());
            let Some(state) = session.document(&id) else {
                bail!("document {} has not appeared by event {}", id, self.at);
            };
            write_buffer(out, &format!("editor {}", id), &state.text())?;
            return Ok(());
        }
        write_buffers(&session, out)
    }
}

/// Print the shell followed by every editor in creation order.
pub fn write_buffers(session: &ReplaySession, out: &mut impl Write) -> Result<()> {
    write_shell(session, out)?;
    for (id, state) in session.editors().iter() {
        write_buffer(out, &format!("editor {}", id), &state.text())?;
    }
    Ok(())
}

fn write_shell(session: &ReplaySession, out: &mut impl Write) -> Result<()> {
    write_buffer(out, "shell", &session.shell().text())
}

fn write_buffer(out: &mut impl Write, title: &str, text: &str) -> Result<()> {
    writeln!(out, "== {} ==", title)?;
    write!(out, "{}", text)?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
