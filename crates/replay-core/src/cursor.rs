// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{ReplayError, Result, engine::ReplayTarget, loader::EventLog};
use tracing::debug;

/// Work done by one seek.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeekStats {
    pub applied: usize,
    pub undone: usize,
}

impl SeekStats {
    /// Number of apply/undo steps, always the distance moved.
    pub fn steps(&self) -> usize {
        self.applied + self.undone
    }
}

/// Index of the last applied event; `-1` when nothing is applied.
///
/// All buffers reflect exactly events `0..=position` at every point between
/// steps: an event is undone before the position moves below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineCursor {
    position: isize,
}

impl Default for TimelineCursor {
    fn default() -> Self {
        Self { position: -1 }
    }
}

impl TimelineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Back to "nothing applied". Buffers must be cleared alongside.
    pub fn reset(&mut self) {
        self.position = -1;
    }

    /// Move to `target`, applying or undoing only the events in between.
    ///
    /// Fails with [`ReplayError::OutOfRange`] unless `-1 <= target < log.len()`,
    /// in which case nothing moves.
    pub fn seek<R: ReplayTarget>(
        &mut self,
        target: isize,
        log: &EventLog,
        replay: &mut R,
    ) -> Result<SeekStats> {
        if target < -1 || target > log.last_index() {
            return Err(ReplayError::OutOfRange {
                target,
                len: log.len(),
            });
        }

        let mut stats = SeekStats::default();
        while self.position < target {
            let next = (self.position + 1) as usize;
            replay.apply(next, &log[next]);
            self.position += 1;
            stats.applied += 1;
        }
        while self.position > target {
            let current = self.position as usize;
            replay.undo(current, &log[current]);
            self.position -= 1;
            stats.undone += 1;
        }

        if stats.steps() > 0 {
            debug!(
                position = self.position,
                applied = stats.applied,
                undone = stats.undone,
                "seek complete"
            );
        }
        Ok(stats)
    }
}
