// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for built-in dispatch.

use super::*;

#[test]
fn exit_is_recognized_without_running_anything() {
    let outcome = dispatch(&["exit".to_string()]);
    assert!(matches!(outcome, BuiltinOutcome::Exit));
}

#[test]
fn unknown_command_is_not_a_builtin() {
    let outcome = dispatch(&["ls".to_string()]);
    assert!(matches!(outcome, BuiltinOutcome::NotBuiltin));
}

#[yare::parameterized(
    list_tasks = { "list_tasks" },
    liste_ps = { "liste_ps" },
)]
fn list_tasks_alias_is_recognized(name: &str) {
    let outcome = dispatch(&[name.to_string()]);
    assert!(matches!(outcome, BuiltinOutcome::Handled(0)));
}

#[test]
fn empty_argv_is_not_a_builtin() {
    assert!(matches!(dispatch(&[]), BuiltinOutcome::NotBuiltin));
}
