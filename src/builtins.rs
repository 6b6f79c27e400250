// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The three intercepted commands: `cd`, `exit`, and `list_tasks` (alias
//! `liste_ps`). Dispatch happens before exec is ever considered, and the
//! same [`dispatch`] function serves both the top-level REPL and a forked
//! pipeline-stage child — only how `BuiltinOutcome::Exit` is handled
//! differs between the two call sites.

use std::path::Path;

use crate::task;

/// What running a resolved argv vector against the built-in table produced.
pub enum BuiltinOutcome {
    /// A built-in ran; this is its exit status.
    Handled(i32),
    /// `exit` was invoked. The top level turns this into a loop break; a
    /// forked child turns it into `std::process::exit(0)`.
    Exit,
    /// Not a built-in name; the caller should exec it instead.
    NotBuiltin,
}

/// Look up `argv[0]` against the built-in table and run it in-process if it
/// matches.
pub fn dispatch(argv: &[String]) -> BuiltinOutcome {
    let Some(name) = argv.first() else {
        return BuiltinOutcome::NotBuiltin;
    };
    match name.as_str() {
        "cd" => BuiltinOutcome::Handled(run_cd(&argv[1..])),
        "exit" => BuiltinOutcome::Exit,
        "list_tasks" | "liste_ps" => BuiltinOutcome::Handled(run_list_tasks()),
        _ => BuiltinOutcome::NotBuiltin,
    }
}

fn run_cd(args: &[String]) -> i32 {
    let target = match args.first() {
        Some(path) => path.clone(),
        None => match dirs::home_dir() {
            Some(home) => home.display().to_string(),
            None => {
                eprintln!("No such directory : ~");
                return 1;
            }
        },
    };
    match std::env::set_current_dir(Path::new(&target)) {
        Ok(()) => 0,
        Err(_) => {
            eprintln!("No such directory : {target}");
            1
        }
    }
}

fn run_list_tasks() -> i32 {
    for (index, task) in task::snapshot() {
        let elapsed = task.started_at.elapsed().as_secs();
        println!("[{index}] pid={} elapsed={elapsed}s argv={:?}", task.pid, task.argv);
    }
    0
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
