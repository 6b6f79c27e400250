// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! yas — yet another shell.
//!
//! Reads a command line, parses it into a [`ast::Command`] tree, evaluates
//! and launches it, and tracks any backgrounded children until a
//! `SIGCHLD`-driven handler reaps them.

pub mod ast;
pub mod builtins;
pub mod config;
pub mod editor;
pub mod error;
pub mod exec;
pub mod history;
pub mod signal;
pub mod span;
pub mod task;

mod parser;

pub use ast::{Argument, Command, Pipeline, SingleCommand};
pub use config::ShellConfig;
pub use error::{ParseError, ParseErrorReason};
pub use parser::parse;
pub use span::Span;

use builtins::BuiltinOutcome;
use editor::LineEditor;

/// Read-eval-print one line: parse, then execute. Returns `false` when the
/// shell should stop (an `exit` built-in was reached).
pub fn eval_line(line: &str) -> bool {
    match parse(line) {
        Ok(None) => true,
        Ok(Some(cmd)) => {
            tracing::debug!(
                text = cmd.span().slice(line),
                background = cmd.is_background(),
                "executing parsed command"
            );
            match exec::execute_top(&cmd) {
                BuiltinOutcome::Exit => false,
                BuiltinOutcome::Handled(_) | BuiltinOutcome::NotBuiltin => true,
            }
        }
        Err(err) => {
            tracing::warn!(position = err.position, reason = %err.reason, "syntax error");
            eprintln!("{}", " ".repeat(5 + err.position) + "^");
            eprintln!("{err}");
            true
        }
    }
}

/// Run the read-eval-print loop to completion against `editor`, using
/// `config` for the prompt and history path.
pub fn run(config: &ShellConfig, editor: &dyn LineEditor) {
    let history_lines = config.history_path.as_deref().map(history::load).unwrap_or_default();
    tracing::debug!(loaded = history_lines.len(), "history loaded");

    loop {
        let line = match editor.read_line(&config.prompt) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::error!(%err, "failed to read a line");
                break;
            }
        };
        if let Some(path) = config.history_path.as_deref() {
            if let Err(err) = history::append(path, &line) {
                tracing::warn!(%err, "failed to append to history");
            }
        }
        if !eval_line(&line) {
            break;
        }
    }
}
