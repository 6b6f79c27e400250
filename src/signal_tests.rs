// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the `SIGCHLD` handler: these fork real children and
//! assert the task registry reaps them back down to zero once the kernel
//! actually delivers the signal, rather than only exercising `task::reap`
//! as a pure data-structure operation.

use std::time::{Duration, Instant};

use nix::unistd::{fork, ForkResult};

use crate::editor::NullEditor;

use super::*;

fn ensure_installed() {
    let _ = install(Box::new(NullEditor));
}

/// Spin until `task::len()` returns to `target` or `timeout` elapses.
fn wait_for_reap(target: usize, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if crate::task::len() == target {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    crate::task::len() == target
}

#[test]
fn a_forked_child_is_reaped_back_to_zero_by_the_real_handler() {
    ensure_installed();
    let before = crate::task::len();

    match unsafe { fork() }.expect("fork should succeed") {
        ForkResult::Child => std::process::exit(0),
        ForkResult::Parent { child } => {
            blocked(|| crate::task::register(child, vec!["true".into()]));
            assert_eq!(crate::task::len(), before + 1);
            assert!(
                wait_for_reap(before, Duration::from_secs(2)),
                "SIGCHLD handler never reaped pid {child}"
            );
        }
    }
}

#[test]
fn two_concurrently_backgrounded_children_both_get_reaped() {
    ensure_installed();
    let before = crate::task::len();

    let mut children = Vec::new();
    for _ in 0..2 {
        match unsafe { fork() }.expect("fork should succeed") {
            ForkResult::Child => std::process::exit(0),
            ForkResult::Parent { child } => children.push(child),
        }
    }
    blocked(|| {
        for child in &children {
            crate::task::register(*child, vec!["true".into()]);
        }
    });
    assert_eq!(crate::task::len(), before + children.len());
    assert!(
        wait_for_reap(before, Duration::from_secs(2)),
        "not all children were reaped"
    );
}
