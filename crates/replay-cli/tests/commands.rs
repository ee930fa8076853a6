// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

// Running the replayer commands against logs written to a temp dir.
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use replay_cli::config::PlaybackConfig;
use replay_cli::inspect::{EventsArgs, ShowArgs};
use replay_cli::play::PlayArgs;
use tempfile::TempDir;

const LOG: &str = r#"[
  {"sequence": "TextInsert", "text_widget_id": 7, "time": "2017-05-16T10:00:00.0",
   "index": "1.0", "text": "x = 1\n", "tags": "()"},
  {"sequence": "TextInsert", "text_widget_id": 3, "text_widget_context": "shell",
   "time": "2017-05-16T10:00:03.0", "index": "end", "text": ">>> ", "tags": "('prompt',)"},
  {"sequence": "TextInsert", "text_widget_id": 7, "time": "2017-05-16T10:00:13.0",
   "index": "2.0", "text": "y = 2", "tags": "()"},
  {"sequence": "TextDelete", "text_widget_id": 7, "time": "2017-05-16T10:00:14.0",
   "index1": "1.0", "index2": "2.0"}
]"#;

fn write_log() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.txt");
    fs::write(&path, LOG).unwrap();
    (dir, path)
}

fn output(run: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
    let mut out = Vec::new();
    run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn events_lists_every_row_with_pauses() {
    let (_dir, log) = write_log();
    let text = output(|out| EventsArgs { log }.run(out));
    let pauses: Vec<&str> = text
        .lines()
        .map(|line| line.split_whitespace().nth(1).unwrap_or(""))
        .collect();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().next().unwrap().starts_with("    0        2017-05-16T10:00:00.0"));
    assert_eq!(pauses[1], "3");
    assert_eq!(pauses[2], "10");
}

#[test]
fn show_prints_shell_and_editors() {
    let (_dir, log) = write_log();
    let args = ShowArgs {
        log,
        at: 2,
        document: None,
        shell: false,
    };
    assert_eq!(
        output(|out| args.run(out)),
        "== shell ==\n>>> \n== editor 7 ==\nx = 1\ny = 2\n"
    );
}

#[test]
fn show_single_document_and_rewound_state() {
    let (_dir, log) = write_log();
    let args = ShowArgs {
        log: log.clone(),
        at: 3,
        document: Some("7".into()),
        shell: false,
    };
    assert_eq!(output(|out| args.run(out)), "== editor 7 ==\ny = 2\n");

    let args = ShowArgs {
        log,
        at: -1,
        document: None,
        shell: true,
    };
    assert_eq!(output(|out| args.run(out)), "== shell ==\n");
}

#[test]
fn show_rejects_unknown_document_and_position() {
    let (_dir, log) = write_log();
    let unknown = ShowArgs {
        log: log.clone(),
        at: 3,
        document: Some("99".into()),
        shell: false,
    };
    assert!(unknown.run(&mut Vec::new()).is_err());

    let past_end = ShowArgs {
        log,
        at: 4,
        document: None,
        shell: false,
    };
    assert!(past_end.run(&mut Vec::new()).is_err());
}

#[test]
fn play_waits_for_scaled_pauses() {
    let (_dir, log) = write_log();
    let args = PlayArgs {
        log,
        from: Some(0),
        to: None,
        speed: Some(2.0),
        max_pause: None,
    };
    let playback = PlaybackConfig {
        speed: 1.0,
        max_pause_secs: Some(4.0),
    };

    let mut waits = Vec::new();
    let mut out = Vec::new();
    args.run_with(&playback, &mut out, |d| waits.push(d)).unwrap();

    assert_eq!(
        waits,
        vec![
            Duration::from_millis(1500),
            Duration::from_secs(4),
            Duration::from_millis(500),
        ]
    );
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("    ")).count(), 3);
    assert!(text.ends_with("== shell ==\n>>> \n== editor 7 ==\ny = 2\n"), "{text}");
}

#[test]
fn play_rejects_bad_speed() {
    let (_dir, log) = write_log();
    let args = PlayArgs {
        log,
        from: None,
        to: Some(1),
        speed: Some(0.0),
        max_pause: None,
    };
    assert!(args
        .run_with(&PlaybackConfig::default(), &mut Vec::new(), |_| {})
        .is_err());
}

#[test]
fn play_with_crawling_speed_respects_max_pause() {
    let (_dir, log) = write_log();
    let args = PlayArgs {
        log,
        from: Some(1),
        to: None,
        speed: Some(1e-300),
        max_pause: Some(2.0),
    };
    let mut waits = Vec::new();
    args.run_with(&PlaybackConfig::default(), &mut Vec::new(), |d| waits.push(d))
        .unwrap();
    assert_eq!(waits, vec![Duration::from_secs(2), Duration::from_secs(2)]);
}
