// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for history file persistence.

use tempfile::tempdir;

use super::*;

#[test]
fn load_of_missing_file_is_empty() {
    let path = Path::new("/nonexistent/path/for/yas/history/tests");
    assert!(load(path).is_empty());
}

#[test]
fn append_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history");
    append(&path, "echo one").unwrap();
    append(&path, "echo two").unwrap();
    assert_eq!(load(&path), vec!["echo one".to_string(), "echo two".to_string()]);
}

#[test]
fn append_creates_the_file_if_missing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fresh-history");
    assert!(!path.exists());
    append(&path, "echo hi").unwrap();
    assert!(path.exists());
}
