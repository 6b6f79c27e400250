// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for the recursive-descent parser.

use super::*;

fn parse_ok(input: &str) -> Command {
    match parse(input) {
        Ok(Some(cmd)) => cmd,
        other => panic!("expected a parsed command for {input:?}, got {other:?}"),
    }
}

#[test]
fn simple_command() {
    let cmd = parse_ok("echo hello");
    match cmd {
        Command::Single(s) => {
            assert_eq!(s.args, vec![
                Argument::Literal("echo".into(), false),
                Argument::Literal("hello".into(), false),
            ]);
        }
        _ => panic!("expected single command"),
    }
}

#[test]
fn quoted_argument_preserves_spaces() {
    let cmd = parse_ok(r#"echo "a b" c"#);
    match cmd {
        Command::Single(s) => {
            assert_eq!(s.args[1], Argument::Literal("a b".into(), true));
            assert_eq!(s.args[2], Argument::Literal("c".into(), false));
        }
        _ => panic!("expected single command"),
    }
}

#[test]
fn variable_reference() {
    let cmd = parse_ok("echo $HOME");
    match cmd {
        Command::Single(s) => assert_eq!(s.args[1], Argument::Variable("HOME".into(), false)),
        _ => panic!("expected single command"),
    }
}

#[test]
fn dollar_paren_substitution() {
    let cmd = parse_ok("echo $(echo x y)");
    match cmd {
        Command::Single(s) => assert!(matches!(s.args[1], Argument::Substitution(_, false))),
        _ => panic!("expected single command"),
    }
}

#[test]
fn quoted_substitution() {
    let cmd = parse_ok(r#"echo "$(echo x y)""#);
    match cmd {
        Command::Single(s) => assert!(matches!(s.args[1], Argument::Substitution(_, true))),
        _ => panic!("expected single command"),
    }
}

#[test]
fn backtick_substitution() {
    let cmd = parse_ok("echo `echo hi`");
    match cmd {
        Command::Single(s) => assert!(matches!(s.args[1], Argument::Substitution(_, false))),
        _ => panic!("expected single command"),
    }
}

#[test]
fn concatenation_associativity() {
    std::env::set_var("X", "MID");
    let cmd = parse_ok(r#"a$Xb"c""#);
    match cmd {
        Command::Single(s) => match &s.args[0] {
            Argument::Concatenation(parts) => {
                assert!(parts.len() >= 2);
                assert_eq!(parts[0], Argument::Literal("a".into(), false));
                assert_eq!(parts[1], Argument::Variable("X".into(), false));
            }
            other => panic!("expected concatenation, got {other:?}"),
        },
        _ => panic!("expected single command"),
    }
}

#[test]
fn pipeline_of_three() {
    let cmd = parse_ok("A | B | C");
    match cmd {
        Command::Pipeline(p) => assert_eq!(p.stages.len(), 3),
        _ => panic!("expected pipeline"),
    }
}

#[test]
fn background_pipeline_of_two() {
    let cmd = parse_ok("A & B");
    match cmd {
        Command::Pipeline(p) => {
            assert_eq!(p.stages.len(), 2);
            assert!(p.stages[0].background);
            assert!(!p.stages[1].background);
        }
        _ => panic!("expected pipeline"),
    }
}

#[test]
fn trailing_ampersand_is_background_single_command() {
    let cmd = parse_ok("sleep 1 &");
    match cmd {
        Command::Single(s) => assert!(s.background),
        _ => panic!("expected single command"),
    }
}

#[test]
fn redirections_resolve_around_command() {
    let cmd = parse_ok("> out < in cmd");
    match cmd {
        Command::Single(s) => {
            assert_eq!(s.args, vec![Argument::Literal("cmd".into(), false)]);
            assert_eq!(s.redir_out, Some(Argument::Literal("out".into(), false)));
            assert_eq!(s.redir_in, Some(Argument::Literal("in".into(), false)));
        }
        _ => panic!("expected single command"),
    }
}

#[test]
fn pipeline_span_covers_every_stage() {
    let cmd = parse_ok("echo a | echo b");
    match cmd {
        Command::Pipeline(p) => {
            assert_eq!(p.span.start, p.stages[0].span.start);
            assert_eq!(p.span.end, p.stages[1].span.end);
        }
        _ => panic!("expected pipeline"),
    }
}

#[yare::parameterized(
    duplicated_input = { "foo < a < b", ParseErrorReason::DuplicatedInput },
    duplicated_output = { "foo > a > b", ParseErrorReason::DuplicatedOutput },
    unmatched_substitution = { "echo $(echo x", ParseErrorReason::UnmatchingDelimiters },
    lone_dollar = { "echo $!", ParseErrorReason::UnknownSyntax },
)]
fn rejected_input_carries_the_expected_reason(input: &str, reason: ParseErrorReason) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.reason, reason);
}

#[test]
fn comment_only_line_parses_to_nothing() {
    assert_eq!(parse("# just a comment").unwrap(), None);
}

#[test]
fn blank_line_parses_to_nothing() {
    assert_eq!(parse("   ").unwrap(), None);
}

#[test]
fn error_position_is_within_bounds() {
    let input = "foo < a < b";
    let err = parse(input).unwrap_err();
    assert!(err.position <= input.len());
}
