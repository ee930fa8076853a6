// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::buffer::{MemoryBuffer, TextBuffer};
use crate::document::{DocumentRegistry, DocumentState};
use crate::model::{BufferContext, DocumentId, DocumentTarget, Event};
use tracing::trace;

/// Something the timeline cursor can move through a log.
///
/// Both methods receive the event together with its position in the log.
/// Callers guarantee ordering: `apply` only with the event right after the
/// current position, `undo` only with the event at the current position.
pub trait ReplayTarget {
    fn apply(&mut self, index: usize, event: &Event);
    fn undo(&mut self, index: usize, event: &Event);
}

/// Routes events to the shell buffer or to the editor document they name.
#[derive(Debug)]
pub struct ReplayEngine<B = MemoryBuffer> {
    shell: DocumentState<B>,
    editors: DocumentRegistry<B>,
}

impl<B: TextBuffer + Default> Default for ReplayEngine<B> {
    fn default() -> Self {
        Self {
            shell: DocumentState::new(B::default()),
            editors: DocumentRegistry::new(),
        }
    }
}

impl<B: TextBuffer + Default> ReplayEngine<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shell(&self) -> &DocumentState<B> {
        &self.shell
    }

    pub fn editors(&self) -> &DocumentRegistry<B> {
        &self.editors
    }

    pub fn editors_mut(&mut self) -> &mut DocumentRegistry<B> {
        &mut self.editors
    }

    pub fn document(&self, id: &DocumentId) -> Option<&DocumentState<B>> {
        self.editors.get(id)
    }

    /// Empty the shell and drop every editor document.
    pub fn clear(&mut self) {
        self.shell.reset();
        self.editors.clear();
    }

    fn state_for(&mut self, target: &DocumentTarget) -> &mut DocumentState<B> {
        match target.context {
            BufferContext::Shell => &mut self.shell,
            BufferContext::Editor => self.editors.resolve(&target.id),
        }
    }
}

impl<B: TextBuffer + Default> ReplayTarget for ReplayEngine<B> {
    fn apply(&mut self, index: usize, event: &Event) {
        let Some(target) = &event.target else {
            trace!(index, sequence = %event.sequence, "display-only event");
            return;
        };
        let mutated = self.state_for(target).apply(index, &event.kind);
        trace!(index, sequence = %event.sequence, document = %target.id, mutated, "applied event");
    }

    fn undo(&mut self, index: usize, event: &Event) {
        let Some(target) = &event.target else {
            return;
        };
        let state = match target.context {
            BufferContext::Shell => Some(&mut self.shell),
            BufferContext::Editor => self.editors.get_mut(&target.id),
        };
        let restored = match state {
            Some(state) => {
                let restored = state.undo(index);
                if restored {
                    if let Some(at) = event.reveal_index() {
                        state.reveal(&at);
                    }
                }
                restored
            }
            None => false,
        };
        trace!(index, sequence = %event.sequence, document = %target.id, restored, "undid event");
    }
}
