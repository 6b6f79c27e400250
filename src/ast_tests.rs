// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for the command tree.

use super::*;

#[test]
fn concat_of_one_collapses() {
    let a = Argument::concat(vec![Argument::Literal("x".into(), false)]);
    assert_eq!(a, Argument::Literal("x".into(), false));
}

#[test]
fn concat_of_many_wraps() {
    let a = Argument::concat(vec![
        Argument::Literal("a".into(), false),
        Argument::Variable("X".into(), false),
    ]);
    assert!(matches!(a, Argument::Concatenation(ref v) if v.len() == 2));
}

#[test]
fn concat_quoted_flag_follows_first_piece() {
    let a = Argument::Concatenation(vec![
        Argument::Literal("a".into(), true),
        Argument::Literal("b".into(), false),
    ]);
    assert!(a.quoted());
}

#[test]
fn single_command_defaults_foreground() {
    let cmd = SingleCommand::new(vec![Argument::Literal("echo".into(), false)], Span::empty(0));
    assert!(!cmd.background);
    assert!(cmd.redir_in.is_none());
    assert!(cmd.redir_out.is_none());
}

#[test]
fn command_span_and_background_read_through_to_the_active_variant() {
    let single = SingleCommand::new(vec![Argument::Literal("echo".into(), false)], Span::new(0, 4));
    let cmd = Command::Single(single.clone());
    assert_eq!(cmd.span(), Span::new(0, 4));
    assert!(!cmd.is_background());

    let mut bg = single;
    bg.background = true;
    let pipeline = Pipeline { stages: vec![bg], background: true, span: Span::new(0, 9) };
    let cmd = Command::Pipeline(pipeline);
    assert_eq!(cmd.span(), Span::new(0, 9));
    assert!(cmd.is_background());
}
