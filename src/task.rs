// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The background task registry.
//!
//! A single shell process has exactly one registry, so it is kept as
//! process-global state behind a mutex rather than threaded through every
//! call that might spawn a background job. The signal handler and the main
//! context both reach it through the same free functions; callers that
//! mutate it from the main context must block `SIGCHLD` first (see
//! [`crate::signal::blocked`]) so the handler never observes a half-updated
//! slot list.

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use nix::unistd::Pid;

/// Bookkeeping for one backgrounded child.
#[derive(Debug, Clone)]
pub struct Task {
    pub pid: Pid,
    pub argv: Vec<String>,
    pub started_at: Instant,
}

fn registry() -> &'static Mutex<Vec<Option<Task>>> {
    static REGISTRY: OnceLock<Mutex<Vec<Option<Task>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

/// Insert a new task record, reusing the first vacated slot if one exists.
/// Returns the slot's index, used as the `[index]` shown to the user.
pub fn register(pid: Pid, argv: Vec<String>) -> usize {
    let task = Task { pid, argv, started_at: Instant::now() };
    let mut slots = registry().lock().unwrap_or_else(|e| e.into_inner());
    if let Some(index) = slots.iter().position(Option::is_none) {
        slots[index] = Some(task);
        tracing::debug!(pid = %pid, index, "background task registered");
        return index;
    }
    slots.push(Some(task));
    let index = slots.len() - 1;
    tracing::debug!(pid = %pid, index, "background task registered");
    index
}

/// Remove and return the task matching `pid`, if the registry still holds
/// one. Called from the signal handler on every child-termination delivery.
pub fn reap(pid: Pid) -> Option<(usize, Task)> {
    let mut slots = registry().lock().unwrap_or_else(|e| e.into_inner());
    let index = slots.iter().position(|s| matches!(s, Some(t) if t.pid == pid))?;
    slots[index].take().map(|t| (index, t))
}

/// Snapshot the current live entries as `(index, task)` pairs, for
/// `list_tasks`.
pub fn snapshot() -> Vec<(usize, Task)> {
    let slots = registry().lock().unwrap_or_else(|e| e.into_inner());
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.clone().map(|t| (i, t)))
        .collect()
}

/// Number of still-registered tasks, used by tests to assert the registry
/// reaps back down to zero.
pub fn len() -> usize {
    registry().lock().unwrap_or_else(|e| e.into_inner()).iter().filter(|s| s.is_some()).count()
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
