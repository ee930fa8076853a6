// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{
    ReplayError, Result,
    model::{DocumentTarget, Event},
};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Ordered, immutable sequence of recorded events.
///
/// Order is the order stored in the file. Timestamps only feed the
/// display-only pauses and are never used to reorder anything.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    pauses: Vec<Duration>,
    source: Option<PathBuf>,
}

impl EventLog {
    /// Build a log from events already in replay order.
    pub fn from_events(events: Vec<Event>) -> Self {
        let pauses = compute_pauses(&events);
        Self {
            events,
            pauses,
            source: None,
        }
    }

    /// Load a log file: a single JSON array of flat event records.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut log = Self::from_json_str(&contents).map_err(|err| match err {
            ReplayError::LogFormat(msg) => ReplayError::format(format!("{:?}: {}", path, msg)),
            other => other,
        })?;
        log.source = Some(path.to_path_buf());
        debug!(path = ?path, events = log.len(), "loaded event log");
        Ok(log)
    }

    /// Parse a log from its JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(contents)
            .map_err(|err| ReplayError::format(format!("invalid JSON: {}", err)))?;
        let Value::Array(records) = raw else {
            return Err(ReplayError::format("expected a JSON array of event records"));
        };
        let events = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| Event::from_record(position, record))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_events(events))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Pause before each event, parallel to [`EventLog::events`].
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Largest valid seek target; `-1` for an empty log.
    pub fn last_index(&self) -> isize {
        self.events.len() as isize - 1
    }

    /// Every distinct buffer the log writes to, in first-seen order.
    pub fn targets(&self) -> Vec<&DocumentTarget> {
        let mut seen: Vec<&DocumentTarget> = Vec::new();
        for target in self.events.iter().filter_map(|e| e.target.as_ref()) {
            if !seen.contains(&target) {
                seen.push(target);
            }
        }
        seen
    }
}

impl Index<usize> for EventLog {
    type Output = Event;

    fn index(&self, index: usize) -> &Self::Output {
        &self.events[index]
    }
}

/// Whole seconds elapsed since the previous event.
///
/// The first event, and any event whose clock reads earlier than its
/// predecessor's, gets a zero pause.
fn compute_pauses(events: &[Event]) -> Vec<Duration> {
    let mut pauses = Vec::with_capacity(events.len());
    let mut previous: Option<NaiveDateTime> = None;
    for event in events {
        let pause = match previous {
            Some(prev) => {
                let seconds = (event.time - prev).num_seconds();
                Duration::from_secs(seconds.max(0) as u64)
            }
            None => Duration::ZERO,
        };
        pauses.push(pause);
        previous = Some(event.time);
    }
    pauses
}

/// Render a pause the way the event list shows it: blank when zero.
pub fn display_pause(pause: Duration) -> String {
    match pause.as_secs() {
        0 => String::new(),
        secs => secs.to_string(),
    }
}
