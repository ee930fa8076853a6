// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::{ReplayError, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// `sequence` value of a recorded text insertion.
pub const SEQUENCE_TEXT_INSERT: &str = "TextInsert";
/// `sequence` value of a recorded text deletion.
pub const SEQUENCE_TEXT_DELETE: &str = "TextDelete";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Opaque identifier of the text widget an event was recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which family of buffers an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferContext {
    Shell,
    #[default]
    Editor,
}

impl BufferContext {
    /// Anything other than `"shell"` (including a missing field) is an editor.
    pub fn from_field(value: Option<&str>) -> Self {
        match value {
            Some("shell") => Self::Shell,
            _ => Self::Editor,
        }
    }
}

/// Routing information carried by buffer-related events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentTarget {
    pub id: DocumentId,
    pub context: BufferContext,
}

/// Position inside a text buffer as recorded by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextIndex {
    /// Absolute character offset from the start of the buffer.
    Offset(usize),
    /// 1-based line, 0-based character column (`"3.14"`).
    LineColumn { line: usize, column: usize },
    /// End of the buffer (`"end"`).
    End,
}

impl TextIndex {
    pub fn line_column(line: usize, column: usize) -> Self {
        Self::LineColumn { line, column }
    }

    fn from_value(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(s) => s.parse(),
            Value::Number(n) => n
                .as_u64()
                .map(|n| Self::Offset(n as usize))
                .ok_or_else(|| format!("offset {} is not a non-negative integer", n)),
            other => Err(format!("expected a text index, got {}", other)),
        }
    }
}

impl FromStr for TextIndex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s == "end" {
            return Ok(Self::End);
        }
        let (line, column) = s
            .split_once('.')
            .ok_or_else(|| format!("invalid text index {:?}; expected 'line.column' or 'end'", s))?;
        let line = line
            .parse::<usize>()
            .map_err(|_| format!("invalid line in text index {:?}", s))?;
        let column = column
            .parse::<usize>()
            .map_err(|_| format!("invalid column in text index {:?}", s))?;
        Ok(Self::LineColumn { line, column })
    }
}

impl fmt::Display for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "{}", offset),
            Self::LineColumn { line, column } => write!(f, "{}.{}", line, column),
            Self::End => f.write_str("end"),
        }
    }
}

/// Payload of an event, by sequence kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Insert {
        at: TextIndex,
        text: String,
        tags: Vec<String>,
    },
    /// `end == None` removes the single character at `start`.
    Delete {
        start: TextIndex,
        end: Option<TextIndex>,
    },
    /// Recorded for display only.
    Other,
}

/// One recorded editor event with a fixed position in its log.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub sequence: String,
    pub time: NaiveDateTime,
    pub target: Option<DocumentTarget>,
    pub kind: EventKind,
    /// The record exactly as stored, for display.
    pub record: Map<String, Value>,
}

impl Event {
    /// Build an event from one flat key/value record of the log file.
    ///
    /// `position` is only used to make error messages point at the right record.
    pub fn from_record(position: usize, value: Value) -> Result<Self> {
        let record = match value {
            Value::Object(map) => map,
            other => {
                return Err(ReplayError::format(format!(
                    "record {} is not an object: {}",
                    position, other
                )));
            }
        };
        let field_err = |field: &str, msg: String| {
            ReplayError::format(format!("record {} field '{}': {}", position, field, msg))
        };

        let sequence = match record.get("sequence") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(field_err("sequence", format!("expected a string, got {}", other))),
            None => return Err(field_err("sequence", "missing".into())),
        };

        let time = match record.get("time") {
            Some(Value::String(raw)) => parse_time(raw)
                .ok_or_else(|| field_err("time", format!("unparsable timestamp {:?}", raw)))?,
            Some(other) => return Err(field_err("time", format!("expected a string, got {}", other))),
            None => return Err(field_err("time", "missing".into())),
        };

        let target = match record.get("text_widget_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(DocumentId::new(s.clone())),
            Some(Value::Number(n)) => Some(DocumentId::new(n.to_string())),
            Some(other) => {
                return Err(field_err(
                    "text_widget_id",
                    format!("expected a string or number, got {}", other),
                ));
            }
        }
        .map(|id| DocumentTarget {
            id,
            context: BufferContext::from_field(
                record.get("text_widget_context").and_then(Value::as_str),
            ),
        });

        let index_field = |field: &str| -> Result<TextIndex> {
            let value = record.get(field).ok_or_else(|| field_err(field, "missing".into()))?;
            TextIndex::from_value(value).map_err(|msg| field_err(field, msg))
        };

        let kind = match sequence.as_str() {
            SEQUENCE_TEXT_INSERT => {
                let at = index_field("index")?;
                let text = match record.get("text") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => {
                        return Err(field_err("text", format!("expected a string, got {}", other)));
                    }
                    None => return Err(field_err("text", "missing".into())),
                };
                let tags = parse_tags(record.get("tags")).map_err(|msg| field_err("tags", msg))?;
                EventKind::Insert { at, text, tags }
            }
            SEQUENCE_TEXT_DELETE => {
                let start = index_field("index1")?;
                let end = match record.get("index2") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) if s.trim().is_empty() => None,
                    Some(_) => Some(index_field("index2")?),
                };
                EventKind::Delete { start, end }
            }
            _ => EventKind::Other,
        };

        Ok(Self {
            sequence,
            time,
            target,
            kind,
            record,
        })
    }

    /// Whether applying this event can mutate a buffer.
    pub fn is_replayable(&self) -> bool {
        self.target.is_some() && !matches!(self.kind, EventKind::Other)
    }

    /// Compact one-line rendering of the raw record.
    pub fn description(&self) -> String {
        Value::Object(self.record.clone()).to_string()
    }

    /// The `time` field as it appears in the log.
    pub fn raw_time(&self) -> &str {
        self.record.get("time").and_then(Value::as_str).unwrap_or_default()
    }

    /// Position the view should scroll to when this event is shown.
    pub fn reveal_index(&self) -> Option<TextIndex> {
        match &self.kind {
            EventKind::Insert { at, .. } => Some(*at),
            EventKind::Delete { start, .. } => Some(*start),
            EventKind::Other => None,
        }
    }
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

/// Extract tag names from the recorded `tags` field.
///
/// Recorders store the tag collection as a literal (`"('toplevel',)"`), so every
/// quoted string literal is a tag. A JSON array of strings and a bare
/// whitespace-separated list are accepted as well.
pub fn parse_tags(value: Option<&Value>) -> std::result::Result<Vec<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("tag {} is not a string", item))
            })
            .collect(),
        Some(Value::String(literal)) => parse_tag_literal(literal),
        Some(other) => Err(format!("expected a tag collection, got {}", other)),
    }
}

fn parse_tag_literal(literal: &str) -> std::result::Result<Vec<String>, String> {
    if !literal.contains(['\'', '"']) {
        let bare = literal.trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | '{' | '}'));
        let tags: Vec<String> = bare
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !tags.is_empty() {
            warn!(literal, "tag collection has no quoted literals, splitting on whitespace");
        }
        return Ok(tags);
    }

    let mut tags = Vec::new();
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\'' && c != '"' {
            continue;
        }
        let quote = c;
        let mut tag = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('n') => tag.push('\n'),
                    Some('t') => tag.push('\t'),
                    Some(other) => tag.push(other),
                    None => break,
                },
                c if c == quote => {
                    closed = true;
                    break;
                }
                c => tag.push(c),
            }
        }
        if !closed {
            return Err(format!("unterminated string literal in {:?}", literal));
        }
        tags.push(tag);
    }
    Ok(tags)
}
