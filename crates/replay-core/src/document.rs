// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::buffer::TextBuffer;
use crate::model::{DocumentId, EventKind, TextIndex};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, trace};

/// One replayable text buffer and the content it had before each applied event.
///
/// Snapshots are keyed by the event's position in the log. Restoring one puts
/// the buffer back exactly, which also covers deletions whose removed text is
/// not part of the recorded event.
#[derive(Debug, Default)]
pub struct DocumentState<B> {
    buffer: B,
    snapshots_before: HashMap<usize, String>,
}

impl<B: TextBuffer> DocumentState<B> {
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            snapshots_before: HashMap::new(),
        }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.get_all()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots_before.len()
    }

    pub fn snapshot_before(&self, event_index: usize) -> Option<&str> {
        self.snapshots_before.get(&event_index).map(String::as_str)
    }

    /// Apply the mutation of the event at `event_index`.
    ///
    /// Returns `false` for display-only kinds, which leave the buffer and the
    /// snapshot cache untouched.
    pub fn apply(&mut self, event_index: usize, kind: &EventKind) -> bool {
        if matches!(kind, EventKind::Other) {
            return false;
        }
        if !self.snapshots_before.contains_key(&event_index) {
            let before = self.buffer.get_all();
            self.snapshots_before.insert(event_index, before);
        }
        match kind {
            EventKind::Insert { at, text, tags } => {
                self.buffer.reveal(at);
                self.buffer.insert(at, text, tags);
            }
            EventKind::Delete { start, end } => {
                self.buffer.reveal(start);
                self.buffer.delete(start, end.as_ref());
            }
            EventKind::Other => {}
        }
        true
    }

    /// Restore the content captured before the event at `event_index`.
    ///
    /// Returns `false` when no snapshot exists for that event.
    pub fn undo(&mut self, event_index: usize) -> bool {
        match self.snapshots_before.get(&event_index) {
            Some(before) => {
                self.buffer.replace_all(before);
                true
            }
            None => false,
        }
    }

    pub fn reveal(&mut self, at: &TextIndex) {
        self.buffer.reveal(at);
    }

    /// Empty the buffer and forget every snapshot.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.snapshots_before.clear();
    }
}

type CreationListener = Box<dyn FnMut(&DocumentId)>;

/// Editor documents keyed by id, created lazily on first reference.
///
/// Documents are only ever discarded all at once, via [`DocumentRegistry::clear`].
pub struct DocumentRegistry<B> {
    documents: HashMap<DocumentId, DocumentState<B>>,
    order: Vec<DocumentId>,
    listeners: Vec<CreationListener>,
}

impl<B> Default for DocumentRegistry<B> {
    fn default() -> Self {
        Self {
            documents: HashMap::new(),
            order: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

impl<B> fmt::Debug for DocumentRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRegistry")
            .field("documents", &self.order)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<B: TextBuffer + Default> DocumentRegistry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the document for `id`, creating an empty one if it was never seen.
    pub fn resolve(&mut self, id: &DocumentId) -> &mut DocumentState<B> {
        match self.documents.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!(document = %id, "opening replay document");
                self.order.push(id.clone());
                for listener in &mut self.listeners {
                    listener(id);
                }
                entry.insert(DocumentState::new(B::default()))
            }
        }
    }

    pub fn get(&self, id: &DocumentId) -> Option<&DocumentState<B>> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut DocumentState<B>> {
        self.documents.get_mut(id)
    }

    /// Document ids in creation order.
    pub fn ids(&self) -> &[DocumentId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &DocumentState<B>)> {
        self.order
            .iter()
            .filter_map(move |id| self.documents.get(id).map(|state| (id, state)))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Be told about every document created from now on.
    pub fn on_create(&mut self, listener: impl FnMut(&DocumentId) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Discard every document and, with them, every snapshot.
    pub fn clear(&mut self) {
        trace!(documents = self.documents.len(), "clearing document registry");
        self.documents.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryBuffer;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn insert(offset: usize, text: &str) -> EventKind {
        EventKind::Insert {
            at: TextIndex::Offset(offset),
            text: text.into(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn snapshot_is_captured_once_per_event() {
        let mut state = DocumentState::new(MemoryBuffer::new());
        assert!(state.apply(0, &insert(0, "ab")));
        assert_eq!(state.snapshot_before(0), Some(""));

        assert!(state.undo(0));
        state.buffer.replace_all("tampered");
        assert!(state.apply(0, &insert(0, "ab")));
        assert_eq!(state.snapshot_before(0), Some(""));
        assert_eq!(state.snapshot_count(), 1);
    }

    #[test]
    fn undo_restores_deleted_text() {
        let mut state = DocumentState::new(MemoryBuffer::with_text("hello world"));
        let delete = EventKind::Delete {
            start: TextIndex::Offset(5),
            end: Some(TextIndex::End),
        };
        state.apply(4, &delete);
        assert_eq!(state.text(), "hello");
        assert!(state.undo(4));
        assert_eq!(state.text(), "hello world");
    }

    #[test]
    fn other_events_do_not_snapshot() {
        let mut state = DocumentState::new(MemoryBuffer::with_text("x"));
        assert!(!state.apply(0, &EventKind::Other));
        assert_eq!(state.snapshot_count(), 0);
        assert!(!state.undo(0));
        assert_eq!(state.text(), "x");
    }

    #[test]
    fn apply_reveals_the_edit_position() {
        let mut state = DocumentState::new(MemoryBuffer::with_text("abc"));
        state.apply(0, &insert(2, "-"));
        assert_eq!(state.buffer().revealed(), Some(2));
    }

    #[test]
    fn registry_creates_lazily_and_notifies() {
        let created = Rc::new(RefCell::new(Vec::new()));
        let mut registry: DocumentRegistry<MemoryBuffer> = DocumentRegistry::new();
        let sink = Rc::clone(&created);
        registry.on_create(move |id| sink.borrow_mut().push(id.clone()));

        let a = DocumentId::new("a");
        let b = DocumentId::new("b");
        registry.resolve(&b).apply(0, &insert(0, "bee"));
        registry.resolve(&a);
        registry.resolve(&b);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), &[b.clone(), a.clone()]);
        assert_eq!(*created.borrow(), vec![b.clone(), a.clone()]);
        assert_eq!(registry.get(&b).unwrap().text(), "bee");
        assert_eq!(registry.iter().count(), 2);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get(&b).is_none());
        registry.resolve(&a);
        assert_eq!(created.borrow().len(), 3);
    }
}
