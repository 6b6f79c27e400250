// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Redirection application: opens a stage's `<`/`>` targets and dup2s them
//! onto standard input/output.
//!
//! Called only from inside a freshly forked child, after built-in detection,
//! so a built-in invoked at the top level (never forked) is never subject to
//! its own redirections — only a pipeline stage forks regardless of whether
//! it turns out to be a built-in.

use std::os::fd::RawFd;

use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};

use crate::ast::SingleCommand;
use crate::exec::error::ExecError;
use crate::exec::expand;

/// Open and install this stage's redirections onto the current process's
/// standard input/output. Must run after fork, before exec.
pub(crate) fn apply(
    cmd: &SingleCommand,
    substitute: &mut impl FnMut(&crate::ast::Command) -> Result<String, ExecError>,
) -> Result<(), ExecError> {
    if let Some(arg) = &cmd.redir_in {
        let path = expand::expand_path(arg, substitute)?;
        let fd = nix::fcntl::open(path.as_str(), OFlag::O_RDONLY, Mode::empty())
            .map_err(|_| ExecError::RedirectInFailed(path))?;
        dup2_and_close(fd, 0)?;
    }
    if let Some(arg) = &cmd.redir_out {
        let path = expand::expand_path(arg, substitute)?;
        let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
        let fd = nix::fcntl::open(
            path.as_str(),
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            mode,
        )
        .map_err(|_| ExecError::RedirectOutFailed(path))?;
        dup2_and_close(fd, 1)?;
    }
    Ok(())
}

fn dup2_and_close(fd: RawFd, target: i32) -> Result<(), ExecError> {
    dup2(fd, target)?;
    close(fd)?;
    Ok(())
}
