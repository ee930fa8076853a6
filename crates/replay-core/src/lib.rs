// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Edit-log replay shared by the replayer front ends.
//!
//! A recorded editor session is a JSON array of fine-grained events
//! (`TextInsert`, `TextDelete` and display-only kinds) spread over several
//! editor documents and a shell. This crate reconstructs the content of every
//! buffer at any point of that timeline and lets callers scrub back and forth:
//! going forward applies events, going back restores the snapshot taken before
//! each applied event.

mod buffer;
mod cursor;
mod document;
mod engine;
mod error;
mod loader;
mod model;
mod playback;
mod session;

pub use buffer::{MemoryBuffer, TextBuffer};
pub use cursor::{SeekStats, TimelineCursor};
pub use document::{DocumentRegistry, DocumentState};
pub use engine::{ReplayEngine, ReplayTarget};
pub use error::{ReplayError, Result};
pub use loader::{EventLog, display_pause};
pub use model::*;
pub use playback::{PlaybackOptions, PlaybackPlan, PlaybackStep};
pub use session::{DisplayRow, ReplaySession};
