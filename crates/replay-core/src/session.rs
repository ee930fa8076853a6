// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{
    ReplayError, Result,
    buffer::{MemoryBuffer, TextBuffer},
    cursor::{SeekStats, TimelineCursor},
    document::{DocumentRegistry, DocumentState},
    engine::ReplayEngine,
    loader::{EventLog, display_pause},
    model::DocumentId,
};
use std::path::Path;
use tracing::{debug, info};

/// One row of the event list a UI shows next to the buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub index: usize,
    pub description: String,
    /// Whole seconds since the previous event, blank when zero.
    pub pause: String,
    pub time: String,
}

/// A loaded log together with the buffers reconstructed from it.
///
/// This is the surface a UI talks to: load a log, render its rows, and seek
/// whenever the selected row changes.
#[derive(Debug)]
pub struct ReplaySession<B = MemoryBuffer> {
    log: EventLog,
    engine: ReplayEngine<B>,
    cursor: TimelineCursor,
    loading: bool,
}

impl<B: TextBuffer + Default> Default for ReplaySession<B> {
    fn default() -> Self {
        Self {
            log: EventLog::default(),
            engine: ReplayEngine::new(),
            cursor: TimelineCursor::new(),
            loading: false,
        }
    }
}

impl<B: TextBuffer + Default> ReplaySession<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over an already parsed log, rewound.
    pub fn with_log(log: EventLog) -> Self {
        let mut session = Self::new();
        session.install(log);
        session
    }

    /// Load the log at `path`, replacing the current one.
    ///
    /// On failure the previous log, buffers and position are left untouched.
    pub fn load_log(&mut self, path: impl AsRef<Path>) -> Result<&EventLog> {
        self.loading = true;
        let loaded = EventLog::from_file(path.as_ref());
        self.loading = false;
        self.install(loaded?);
        info!(path = ?path.as_ref(), events = self.log.len(), "replay log loaded");
        Ok(&self.log)
    }

    /// Replace the log with `log` and rewind every buffer.
    pub fn install(&mut self, log: EventLog) {
        self.engine.clear();
        self.cursor.reset();
        self.log = log;
    }

    /// Drop the log and every buffer.
    pub fn clear(&mut self) {
        self.install(EventLog::default());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn current_position(&self) -> isize {
        self.cursor.position()
    }

    pub fn seek(&mut self, target: isize) -> Result<SeekStats> {
        self.cursor.seek(target, &self.log, &mut self.engine)
    }

    /// Selection-change entry point for an event list.
    ///
    /// Ignored (`Ok(None)`) while a log is being loaded.
    pub fn select_row(&mut self, index: usize) -> Result<Option<SeekStats>> {
        if self.loading {
            debug!(index, "ignoring selection during log load");
            return Ok(None);
        }
        let target = isize::try_from(index).map_err(|_| ReplayError::OutOfRange {
            target: isize::MAX,
            len: self.log.len(),
        })?;
        self.seek(target).map(Some)
    }

    /// Apply the next event; a no-op at the end of the log.
    pub fn step_forward(&mut self) -> Result<SeekStats> {
        let target = (self.current_position() + 1).min(self.log.last_index());
        self.seek(target)
    }

    /// Undo the current event; a no-op when fully rewound.
    pub fn step_backward(&mut self) -> Result<SeekStats> {
        let target = (self.current_position() - 1).max(-1);
        self.seek(target)
    }

    pub fn rewind(&mut self) -> Result<SeekStats> {
        self.seek(-1)
    }

    pub fn seek_to_end(&mut self) -> Result<SeekStats> {
        self.seek(self.log.last_index())
    }

    pub fn shell(&self) -> &DocumentState<B> {
        self.engine.shell()
    }

    pub fn document(&self, id: &DocumentId) -> Option<&DocumentState<B>> {
        self.engine.document(id)
    }

    pub fn editors(&self) -> &DocumentRegistry<B> {
        self.engine.editors()
    }

    /// Register for document creation, e.g. to open a tab per document.
    pub fn on_document_created(&mut self, listener: impl FnMut(&DocumentId) + 'static) {
        self.engine.editors_mut().on_create(listener);
    }

    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.log
            .iter()
            .zip(self.log.pauses())
            .enumerate()
            .map(|(index, (event, pause))| DisplayRow {
                index,
                description: event.description(),
                pause: display_pause(*pause),
                time: event.raw_time().to_string(),
            })
            .collect()
    }
}
