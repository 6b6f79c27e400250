// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The line-editing contract the core reaches into from two places: the
//! read-eval loop, and the `SIGCHLD` handler (which must blank and later
//! restore whatever's on the current input line before printing a
//! completion notice over it).
//!
//! A real interactive editor (raw mode, history, completion) is out of
//! scope here; [`NullEditor`] and [`StdinEditor`] exist so the core is
//! runnable standalone without pulling one in.

use std::io::{self, Write};

/// Hooks a line editor must provide so the core can read input and stay
/// coherent across asynchronous background-job notices.
pub trait LineEditor: Send + Sync {
    /// Block for one line of input. `Ok(None)` signals end-of-input.
    fn read_line(&self, prompt: &str) -> io::Result<Option<String>>;

    /// Called from the signal handler just before it prints a completion
    /// notice: clear whatever partial line is currently displayed.
    fn pre_signal(&self) {}

    /// Called from the signal handler just after printing: redraw the
    /// prompt and whatever the user had typed so far.
    fn post_signal(&self) {}

    /// Whether the editor currently has a line in progress (used to decide
    /// whether `pre_signal`/`post_signal` have anything to do).
    fn is_busy(&self) -> bool {
        false
    }
}

/// An editor that does nothing beyond the bare minimum; useful for tests
/// and for embedding the core where no interactive terminal exists.
pub struct NullEditor;

impl LineEditor for NullEditor {
    fn read_line(&self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(None)
    }
}

/// A minimal `std::io::stdin`-backed editor with no raw-mode support: no
/// history, no line-redraw on signal, just blocking reads.
pub struct StdinEditor;

impl LineEditor for StdinEditor {
    fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        let n = io::stdin().read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
