// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The text buffer abstraction replay writes into.
//!
//! Rendering is someone else's problem: a GUI can implement [`TextBuffer`] on
//! top of its text widget, while [`MemoryBuffer`] keeps plain text and is what
//! the CLI and the tests use.

use crate::model::TextIndex;
use std::collections::BTreeSet;

/// Positional text storage driven by the replay engine.
pub trait TextBuffer {
    /// Insert `text` at `at`, attaching the formatting `tags`.
    fn insert(&mut self, at: &TextIndex, text: &str, tags: &[String]);

    /// Remove `[start, end)`, or the single character at `start` when `end` is `None`.
    fn delete(&mut self, start: &TextIndex, end: Option<&TextIndex>);

    /// Full content of the buffer.
    fn get_all(&self) -> String;

    fn clear(&mut self);

    /// Scroll `at` into view. Presentation only.
    fn reveal(&mut self, at: &TextIndex);

    /// Replace the whole content, used when restoring a snapshot.
    fn replace_all(&mut self, content: &str) {
        self.clear();
        self.insert(&TextIndex::Offset(0), content, &[]);
    }
}

/// Plain in-memory [`TextBuffer`].
///
/// Line/column indices follow text-widget conventions: lines are 1-based,
/// columns count characters, and out-of-range positions clamp to the nearest
/// valid one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBuffer {
    text: String,
    tags: BTreeSet<String>,
    revealed: Option<usize>,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Every tag name ever attached by an insertion.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Character offset of the last revealed position.
    pub fn revealed(&self) -> Option<usize> {
        self.revealed
    }

    /// Resolve an index to a character offset within the current content.
    pub fn offset_of(&self, index: &TextIndex) -> usize {
        let len = self.char_len();
        match *index {
            TextIndex::Offset(offset) => offset.min(len),
            TextIndex::End => len,
            TextIndex::LineColumn { line, column } => {
                if line == 0 {
                    return 0;
                }
                let mut offset = 0;
                for (number, text) in self.text.split('\n').enumerate() {
                    let width = text.chars().count();
                    if number + 1 == line {
                        return offset + column.min(width);
                    }
                    offset += width + 1;
                }
                len
            }
        }
    }

    fn byte_of(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }
}

impl TextBuffer for MemoryBuffer {
    fn insert(&mut self, at: &TextIndex, text: &str, tags: &[String]) {
        let byte = self.byte_of(self.offset_of(at));
        self.text.insert_str(byte, text);
        self.tags.extend(tags.iter().cloned());
    }

    fn delete(&mut self, start: &TextIndex, end: Option<&TextIndex>) {
        let from = self.offset_of(start);
        let to = match end {
            Some(end) => self.offset_of(end),
            None => (from + 1).min(self.char_len()),
        };
        if to <= from {
            return;
        }
        let (from, to) = (self.byte_of(from), self.byte_of(to));
        self.text.replace_range(from..to, "");
    }

    fn get_all(&self) -> String {
        self.text.clone()
    }

    fn clear(&mut self) {
        self.text.clear();
    }

    fn reveal(&mut self, at: &TextIndex) {
        self.revealed = Some(self.offset_of(at));
    }

    fn replace_all(&mut self, content: &str) {
        self.text.clear();
        self.text.push_str(content);
    }
}
