// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The process launcher: resolves a command tree's arguments, then forks,
//! pipes, and waits to actually run it.
//!
//! Argument resolution happens once per stage in the shell's own context
//! (so a `$(...)` substitution runs exactly once); only redirection targets
//! are resolved inside the forked child itself, matching the source's
//! fork-then-redirect ordering.

use std::ffi::CString;
use std::io::Read;
use std::os::fd::{FromRawFd, IntoRawFd, RawFd};

use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, execvp, fork, pipe, ForkResult, Pid};

use crate::ast::{Command, Pipeline, SingleCommand};
use crate::builtins::{self, BuiltinOutcome};
use crate::exec::error::ExecError;
use crate::exec::{expand, redirect};
use crate::{signal, task};

/// Run a parsed command tree the way the top-level read-eval loop does:
/// built-ins run in-process, and `exit` is reported back as an outcome
/// rather than calling `std::process::exit` directly, so the caller can
/// decide what "exiting the shell" means at the top level.
pub fn execute_top(cmd: &Command) -> BuiltinOutcome {
    match cmd {
        Command::Single(single) => execute_single_top(single),
        Command::Pipeline(pipeline) => BuiltinOutcome::Handled(execute_pipeline(pipeline)),
    }
}

fn execute_single_top(single: &SingleCommand) -> BuiltinOutcome {
    let argv = match resolve_argv(single) {
        Ok(argv) => argv,
        Err(err) => {
            report(&err);
            return BuiltinOutcome::Handled(1);
        }
    };
    if argv.is_empty() {
        return BuiltinOutcome::Handled(0);
    }
    match builtins::dispatch(&argv) {
        BuiltinOutcome::NotBuiltin => {}
        other => return other,
    }
    if single.background {
        spawn_background(single, argv);
        BuiltinOutcome::Handled(0)
    } else {
        BuiltinOutcome::Handled(spawn_foreground(single, &argv))
    }
}

fn resolve_argv(single: &SingleCommand) -> Result<Vec<String>, ExecError> {
    expand::expand_to_words(&single.args, &mut run_substitution)
}

fn spawn_foreground(single: &SingleCommand, argv: &[String]) -> i32 {
    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_stage_child(single, argv),
        Ok(ForkResult::Parent { child }) => wait_for(child),
        Err(err) => {
            report(&ExecError::SystemCall(err));
            1
        }
    }
}

fn spawn_background(single: &SingleCommand, argv: Vec<String>) {
    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_stage_child(single, &argv),
        Ok(ForkResult::Parent { child }) => {
            let index = signal::blocked(|| task::register(child, argv));
            eprintln!("[{index}] {}", child.as_raw());
        }
        Err(err) => report(&ExecError::SystemCall(err)),
    }
}

/// Runs inside a freshly forked child: apply this stage's redirections,
/// then either run a built-in to completion or exec. Never returns.
fn run_stage_child(single: &SingleCommand, argv: &[String]) -> ! {
    if let Err(err) = redirect::apply(single, &mut run_substitution) {
        report(&err);
        std::process::exit(1);
    }
    if argv.is_empty() {
        std::process::exit(0);
    }
    match builtins::dispatch(argv) {
        BuiltinOutcome::Exit => std::process::exit(0),
        BuiltinOutcome::Handled(code) => std::process::exit(code),
        BuiltinOutcome::NotBuiltin => exec_argv(argv),
    }
}

fn exec_argv(argv: &[String]) -> ! {
    let cargs = to_cstrings(argv);
    if cargs.is_empty() {
        std::process::exit(127);
    }
    match execvp(&cargs[0], &cargs) {
        Ok(never) => match never {},
        Err(errno) => {
            eprintln!("Command not found: {}", argv[0]);
            std::process::exit(errno as i32);
        }
    }
}

fn to_cstrings(argv: &[String]) -> Vec<CString> {
    argv.iter().filter_map(|s| CString::new(s.as_str()).ok()).collect()
}

fn wait_for(child: Pid) -> i32 {
    match waitpid(child, None) {
        Ok(WaitStatus::Exited(_, code)) => code,
        Ok(WaitStatus::Signaled(_, sig, _)) => 128 + sig as i32,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Run a pipeline of N stages: allocate N-1 pipes, fork each stage wired to
/// its neighbors, close every pipe fd once inherited, and wait for all
/// non-background stages. A background pipeline registers one task record
/// per stage rather than leaving later stages unwaited-for and untracked.
fn execute_pipeline(pipeline: &Pipeline) -> i32 {
    let n = pipeline.stages.len();
    let mut resolved = Vec::with_capacity(n);
    for stage in &pipeline.stages {
        match resolve_argv(stage) {
            Ok(argv) => resolved.push(argv),
            Err(err) => {
                report(&err);
                return 1;
            }
        }
    }

    let mut raw_pipes: Vec<(RawFd, RawFd)> = Vec::with_capacity(n.saturating_sub(1));
    for _ in 0..n.saturating_sub(1) {
        match pipe() {
            Ok((r, w)) => raw_pipes.push((r.into_raw_fd(), w.into_raw_fd())),
            Err(err) => {
                report(&ExecError::SystemCall(err));
                close_all(&raw_pipes);
                return 1;
            }
        }
    }

    let mut children = Vec::with_capacity(n);
    for (i, stage) in pipeline.stages.iter().enumerate() {
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                if i > 0 {
                    let _ = dup2(raw_pipes[i - 1].0, 0);
                }
                if i < n - 1 {
                    let _ = dup2(raw_pipes[i].1, 1);
                }
                close_all(&raw_pipes);
                run_stage_child(stage, &resolved[i]);
            }
            Ok(ForkResult::Parent { child }) => children.push(child),
            Err(err) => {
                report(&ExecError::SystemCall(err));
                close_all(&raw_pipes);
                return 1;
            }
        }
    }
    close_all(&raw_pipes);

    if pipeline.background {
        signal::blocked(|| {
            for (child, argv) in children.into_iter().zip(resolved.into_iter()) {
                let index = task::register(child, argv);
                eprintln!("[{index}] {}", child.as_raw());
            }
        });
        0
    } else {
        let mut status = 0;
        for child in children {
            status = wait_for(child);
        }
        status
    }
}

fn close_all(raw_pipes: &[(RawFd, RawFd)]) {
    for &(r, w) in raw_pipes {
        let _ = close(r);
        let _ = close(w);
    }
}

/// Run `cmd` with its stdout captured: spawns a child with stdout bound to
/// a pipe, reads the pipe to EOF, strips a single trailing newline if
/// present, and waits for the child. Used by the argument resolver for
/// every `$(...)`/`` `...` `` node.
fn run_substitution(cmd: &Command) -> Result<String, ExecError> {
    let (read_fd, write_fd) = pipe()?;
    let read_fd = read_fd.into_raw_fd();
    let write_fd = write_fd.into_raw_fd();
    match unsafe { fork() }? {
        ForkResult::Child => {
            let _ = close(read_fd);
            let _ = dup2(write_fd, 1);
            let _ = close(write_fd);
            let code = match cmd {
                Command::Single(single) => {
                    let argv = match resolve_argv(single) {
                        Ok(argv) => argv,
                        Err(err) => {
                            report(&err);
                            std::process::exit(1);
                        }
                    };
                    run_stage_child(single, &argv);
                }
                Command::Pipeline(pipeline) => execute_pipeline(pipeline),
            };
            std::process::exit(code);
        }
        ForkResult::Parent { child } => {
            let _ = close(write_fd);
            // SAFETY: `read_fd` is a freshly created pipe read end owned by
            // this process; nothing else will read or close it.
            let mut file = unsafe { std::fs::File::from_raw_fd(read_fd) };
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).map_err(ExecError::SubstitutionFailed)?;
            let _ = waitpid(child, None);
            let mut captured = String::from_utf8_lossy(&buf).into_owned();
            if captured.ends_with('\n') {
                captured.pop();
            }
            Ok(captured)
        }
    }
}

fn report(err: &ExecError) {
    tracing::warn!(%err, "command evaluation failed");
    eprintln!("{err}");
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
