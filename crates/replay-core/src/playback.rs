// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{ReplayError, Result, loader::EventLog};
use std::time::Duration;

/// Configuration for timed playback.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackOptions {
    /// Playback rate. `2.0` replays recorded gaps twice as fast.
    pub speed: f64,
    /// Upper bound for a single wait, so long idle stretches do not stall playback.
    pub max_pause: Option<Duration>,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_pause: None,
        }
    }
}

/// One scheduled seek: wait `delay`, then move the cursor to `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStep {
    pub index: usize,
    pub delay: Duration,
}

/// Iterator over the steps that play a log forward from a cursor position.
#[derive(Debug)]
pub struct PlaybackPlan {
    steps: std::vec::IntoIter<PlaybackStep>,
}

impl PlaybackPlan {
    /// Plan playback of events `from + 1 ..= to`.
    ///
    /// `from` is the current cursor position (`-1` for a rewound log). Each
    /// step waits for the recorded pause before its event, scaled by
    /// `options.speed` and capped by `options.max_pause`. A delay too long to
    /// represent saturates to `Duration::MAX` before the cap.
    pub fn new(log: &EventLog, from: isize, to: usize, options: PlaybackOptions) -> Result<Self> {
        if !options.speed.is_finite() || options.speed <= 0.0 {
            return Err(ReplayError::Playback(format!(
                "speed must be a positive number, got {}",
                options.speed
            )));
        }
        if to >= log.len() {
            return Err(ReplayError::OutOfRange {
                target: to as isize,
                len: log.len(),
            });
        }
        if from < -1 {
            return Err(ReplayError::OutOfRange {
                target: from,
                len: log.len(),
            });
        }

        let start = (from + 1) as usize;
        let steps: Vec<PlaybackStep> = (start..=to)
            .map(|index| {
                let mut delay =
                    Duration::try_from_secs_f64(log.pauses()[index].as_secs_f64() / options.speed)
                        .unwrap_or(Duration::MAX);
                if let Some(cap) = options.max_pause {
                    delay = delay.min(cap);
                }
                PlaybackStep { index, delay }
            })
            .collect();

        Ok(Self {
            steps: steps.into_iter(),
        })
    }

    /// Steps still to come.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Sum of every remaining delay.
    pub fn total_delay(&self) -> Duration {
        self.steps
            .as_slice()
            .iter()
            .fold(Duration::ZERO, |total, step| total.saturating_add(step.delay))
    }
}

impl Iterator for PlaybackPlan {
    type Item = PlaybackStep;

    fn next(&mut self) -> Option<Self::Item> {
        self.steps.next()
    }
}
