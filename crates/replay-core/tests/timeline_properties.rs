// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

// Properties every seek must uphold, checked against hand-written logs.
use pretty_assertions::assert_eq;
use replay_core::{DocumentId, EventLog, ReplaySession};

const INSERT_INSERT_DELETE: &str = r#"[
    {"time": "2017-03-01T12:00:00.0", "sequence": "TextInsert", "text_widget_id": 1, "index": 0, "text": "ab"},
    {"time": "2017-03-01T12:00:01.0", "sequence": "TextInsert", "text_widget_id": 1, "index": 2, "text": "c"},
    {"time": "2017-03-01T12:00:02.0", "sequence": "TextDelete", "text_widget_id": 1, "index1": 1, "index2": 2}
]"#;

// Two editors and a shell interleaved, with display-only events and a shell id
// that collides with an editor id.
const INTERLEAVED: &str = r#"[
    {"time": "2017-03-01T12:00:00.0", "sequence": "TextInsert", "text_widget_id": 1, "index": "1.0", "text": "alpha\nbeta\n", "tags": "()"},
    {"time": "2017-03-01T12:00:00.5", "sequence": "TextInsert", "text_widget_id": 2, "index": "1.0", "text": "import os\n", "tags": "()"},
    {"time": "2017-03-01T12:00:01.0", "sequence": "TextInsert", "text_widget_id": 1, "text_widget_context": "shell", "index": "1.0", "text": ">>> ", "tags": "('prompt',)"},
    {"time": "2017-03-01T12:00:01.0", "sequence": "TextDelete", "text_widget_id": 1, "index1": "2.0", "index2": "2.4"},
    {"time": "2017-03-01T12:00:02.0", "sequence": "<Button-1>", "text_widget_id": 2},
    {"time": "2017-03-01T12:00:03.0", "sequence": "TextInsert", "text_widget_id": 2, "index": "1.6", "text": "s", "tags": "()"},
    {"time": "2017-03-01T12:00:03.0", "sequence": "TextDelete", "text_widget_id": 2, "index1": "1.0"},
    {"time": "2017-03-01T12:00:04.0", "sequence": "Save", "filename": "b.py"},
    {"time": "2017-03-01T12:00:05.0", "sequence": "TextInsert", "text_widget_id": 1, "text_widget_context": "shell", "index": "end", "text": "print(1)\n1\n", "tags": "()"},
    {"time": "2017-03-01T12:00:05.0", "sequence": "TextDelete", "text_widget_id": 1, "index1": "1.0", "index2": "end"},
    {"time": "2017-03-01T12:00:06.0", "sequence": "TextInsert", "text_widget_id": 1, "index": "1.0", "text": "gamma", "tags": "()"}
]"#;

type BufferState = (String, Vec<(String, String)>);

fn session(log: &str) -> ReplaySession {
    ReplaySession::with_log(EventLog::from_json_str(log).unwrap())
}

fn buffers(session: &ReplaySession) -> BufferState {
    let mut editors: Vec<(String, String)> = session
        .editors()
        .iter()
        .map(|(id, state)| (id.to_string(), state.text()))
        .collect();
    editors.sort();
    (session.shell().text(), editors)
}

/// Buffers with documents that are currently empty left out, so states reached
/// by rewinding compare equal to states reached by replaying fewer events.
fn visible(session: &ReplaySession) -> BufferState {
    let (shell, editors) = buffers(session);
    (shell, editors.into_iter().filter(|(_, text)| !text.is_empty()).collect())
}

fn doc(id: &str) -> DocumentId {
    DocumentId::new(id)
}

#[test]
fn insert_insert_delete_round_trip() {
    let mut s = session(INSERT_INSERT_DELETE);
    s.seek(2).unwrap();
    assert_eq!(s.document(&doc("1")).unwrap().text(), "ac");
    s.seek(0).unwrap();
    assert_eq!(s.document(&doc("1")).unwrap().text(), "ab");
    s.seek(-1).unwrap();
    assert_eq!(s.document(&doc("1")).unwrap().text(), "");
}

#[test]
fn round_trip_for_every_pair() {
    let len = EventLog::from_json_str(INTERLEAVED).unwrap().len() as isize;
    for i in -1..len {
        for j in -1..len {
            let mut s = session(INTERLEAVED);
            s.seek(i).unwrap();
            let first = visible(&s);
            s.seek(j).unwrap();
            s.seek(i).unwrap();
            assert_eq!(visible(&s), first, "seek({i}) -> seek({j}) -> seek({i})");
        }
    }
}

#[test]
fn random_access_matches_linear_replay() {
    let len = EventLog::from_json_str(INTERLEAVED).unwrap().len() as isize;
    let expected: Vec<BufferState> = (-1..len)
        .map(|i| {
            let mut s = session(INTERLEAVED);
            s.seek(i).unwrap();
            visible(&s)
        })
        .collect();

    let mut s = session(INTERLEAVED);
    for target in [10, 3, 7, -1, 5, 0, 9, 2, 2, 8, 1, 6, 4, -1, 10] {
        s.seek(target).unwrap();
        assert_eq!(visible(&s), expected[(target + 1) as usize], "at {target}");
    }
}

#[test]
fn repeated_seek_is_noop() {
    let mut s = session(INTERLEAVED);
    s.seek(6).unwrap();
    let before = buffers(&s);
    let stats = s.seek(6).unwrap();
    assert_eq!(stats.steps(), 0);
    assert_eq!(buffers(&s), before);
}

#[test]
fn cost_equals_distance() {
    let mut s = session(INTERLEAVED);
    let mut position = -1isize;
    for target in [4, 10, 0, 0, 7, -1, 3] {
        let stats = s.seek(target).unwrap();
        assert_eq!(stats.steps() as isize, (target - position).abs());
        if target >= position {
            assert_eq!(stats.undone, 0);
        } else {
            assert_eq!(stats.applied, 0);
        }
        position = target;
        assert_eq!(s.current_position(), position);
    }
}

#[test]
fn documents_are_isolated() {
    let mut s = session(INTERLEAVED);
    s.seek(2).unwrap();
    let doc2_before = s.document(&doc("2")).unwrap().text();
    // Event 3 deletes from document 1 only.
    s.seek(3).unwrap();
    assert_eq!(s.document(&doc("2")).unwrap().text(), doc2_before);
    assert_eq!(s.document(&doc("1")).unwrap().text(), "alpha\n\n");
    assert_eq!(s.shell().text(), ">>> ");

    s.seek(6).unwrap();
    assert_eq!(s.document(&doc("2")).unwrap().text(), "mports os\n");
    assert_eq!(s.document(&doc("1")).unwrap().text(), "alpha\n\n");
}

#[test]
fn shell_and_editor_sharing_an_id_stay_independent() {
    let mut s = session(INTERLEAVED);
    s.seek_to_end().unwrap();
    assert_eq!(s.shell().text(), ">>> print(1)\n1\n");
    assert_eq!(s.document(&doc("1")).unwrap().text(), "gamma");
    assert_eq!(s.document(&doc("2")).unwrap().text(), "mports os\n");
    assert_eq!(s.editors().ids(), &[doc("1"), doc("2")]);
}

#[test]
fn rewind_empties_every_buffer() {
    let mut s = session(INTERLEAVED);
    for start in [0, 5, 10] {
        s.seek(start).unwrap();
        s.seek(-1).unwrap();
        let (shell, editors) = buffers(&s);
        assert_eq!(shell, "");
        assert!(editors.iter().all(|(_, text)| text.is_empty()), "{editors:?}");
    }
}

#[test]
fn out_of_range_targets_fail_without_moving() {
    let mut s = session(INTERLEAVED);
    s.seek(4).unwrap();
    let before = buffers(&s);
    for target in [-2, 11, isize::MAX, isize::MIN] {
        let err = s.seek(target).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");
        assert_eq!(s.current_position(), 4);
        assert_eq!(buffers(&s), before);
    }
}
