// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `SIGCHLD` handling: installs a raw signal handler that reaps task
//! registry entries and prints a completion notice, without going through
//! `waitpid` itself (the blocking wait used by foreground commands and
//! pipelines handles its own reaping; this handler only concerns itself
//! with already-backgrounded children).

use std::ffi::c_int;
use std::io::Write;
use std::os::raw::c_void;
use std::sync::OnceLock;

use nix::sys::signal::{sigprocmask, SigSet, SigmaskHow, Signal};
use nix::unistd::Pid;

use crate::editor::LineEditor;

static EDITOR: OnceLock<Box<dyn LineEditor>> = OnceLock::new();

/// Install the `SIGCHLD` handler and record the editor it should notify.
/// Must be called once, before any background task is started.
pub fn install(editor: Box<dyn LineEditor>) -> nix::Result<()> {
    let _ = EDITOR.set(editor);
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handle_sigchld as usize;
        action.sa_flags = libc::SA_RESTART | libc::SA_SIGINFO;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(libc::SIGCHLD, &action, std::ptr::null_mut()) != 0 {
            return Err(nix::errno::Errno::last());
        }
    }
    Ok(())
}

/// Run `f` with `SIGCHLD` blocked, so a handler invocation can't interleave
/// with a main-context mutation of the task registry (background-task
/// insertion is the only such mutation).
pub fn blocked<T>(f: impl FnOnce() -> T) -> T {
    let mut set = SigSet::empty();
    set.add(Signal::SIGCHLD);
    let result = sigprocmask(SigmaskHow::SIG_BLOCK, Some(&set), None);
    let value = f();
    if result.is_ok() {
        let _ = sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&set), None);
    }
    value
}

/// The subset of `siginfo_t`'s `_sifields._sigchld` union this handler
/// needs. `libc::siginfo_t` exposes `si_pid()`/`si_code` directly but does
/// not surface `si_utime`/`si_stime`, so they are read by pointer past the
/// three-word `si_signo`/`si_errno`/`si_code` header that precedes the
/// union on Linux.
#[repr(C)]
struct SigchldFields {
    pid: libc::pid_t,
    uid: libc::uid_t,
    status: c_int,
    utime: libc::c_long,
    stime: libc::c_long,
}

// SAFETY: the handler only calls this with a kernel-supplied `siginfo_t` for
// a delivered `SIGCHLD`, whose common header (`si_signo`, `si_errno`,
// `si_code`) is always three `c_int` words on Linux regardless of the union
// variant; `SigchldFields` is `repr(C)` and matches the in-kernel layout of
// `_sifields._sigchld` byte-for-byte, so the unaligned read is in-bounds and
// well-typed even though nothing in the type system enforces it.
unsafe fn read_sigchld_fields(info: *const libc::siginfo_t) -> SigchldFields {
    let header = info as *const u8;
    let union_ptr = header.add(3 * std::mem::size_of::<c_int>()) as *const SigchldFields;
    std::ptr::read_unaligned(union_ptr)
}

extern "C" fn handle_sigchld(signo: c_int, info: *mut libc::siginfo_t, _ctx: *mut c_void) {
    if signo != libc::SIGCHLD || info.is_null() {
        return;
    }
    // SAFETY: `info` is the kernel-supplied siginfo for this delivery; its
    // `si_code` is guaranteed to be one of the CLD_* values for SIGCHLD.
    let code = unsafe { (*info).si_code };
    if !matches!(
        code,
        libc::CLD_EXITED | libc::CLD_KILLED | libc::CLD_DUMPED | libc::CLD_TRAPPED
            | libc::CLD_STOPPED | libc::CLD_CONTINUED
    ) {
        return;
    }
    let fields = unsafe { read_sigchld_fields(info) };
    let pid = Pid::from_raw(fields.pid);
    let Some((_, task)) = crate::task::reap(pid) else {
        return;
    };

    if let Some(editor) = EDITOR.get() {
        editor.pre_signal();
    }

    let elapsed_ms = task.started_at.elapsed().as_millis().max(1) as f64;
    let reason = match code {
        libc::CLD_EXITED => "Exited",
        libc::CLD_KILLED => "Killed",
        libc::CLD_DUMPED => "Dumped",
        libc::CLD_TRAPPED => "Trapped",
        libc::CLD_STOPPED => "Stopped",
        _ => "Continued",
    };
    let clk_tck = unsafe { libc::sysconf(libc::_SC_CLK_TCK) }.max(1) as f64;
    let ncpu = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) }.max(1) as f64;
    let usr = fields.utime as f64;
    let sys = fields.stime as f64;
    let cpu_pct = (usr + sys) * 1000.0 / (elapsed_ms * ncpu * clk_tck).max(1.0);

    let mut stderr = std::io::stderr();
    let _ = writeln!(
        stderr,
        "[{}] {reason} after {} ms [usr={usr}, sys={sys}, cpu={cpu_pct:.1}%]",
        pid.as_raw(),
        elapsed_ms as u64,
    );
    let _ = stderr.flush();

    if let Some(editor) = EDITOR.get() {
        editor.post_signal();
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
