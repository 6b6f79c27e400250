// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Evaluation and execution error taxonomy.
//!
//! Every surfaced variant's `Display` text is the exact line printed to the
//! user; silent failures (a missing variable) and child-only failures (an
//! exec that never returns) are not modeled here at all — see the error
//! handling design for the split.

/// Errors raised while evaluating an argument tree or launching processes,
/// observed from the shell's own context (never from inside a forked child,
/// which always reports via its exit status instead of returning an error).
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// An argument's glob or tilde expansion could not be completed.
    #[error("Wildcard/tilde expansion failed.")]
    GlobFailed(#[source] glob::PatternError),

    /// Evaluating an argument node produced no usable value. Carries a
    /// `Debug` dump of the offending node for the error line.
    #[error("Argument evaluation failed: {0}")]
    ArgumentFailed(String),

    /// A redirection target could not be opened for reading.
    #[error("Unable to read from {0}.")]
    RedirectInFailed(String),

    /// A redirection target could not be opened for writing.
    #[error("Unable to write into {0}.")]
    RedirectOutFailed(String),

    /// `fork`, `pipe`, or `dup2` failed at the executor level.
    #[error("fork/pipe failed: {0}")]
    SystemCall(#[from] nix::errno::Errno),

    /// A command substitution's capture pipe could not be read to completion.
    #[error("command substitution failed: {0}")]
    SubstitutionFailed(#[source] std::io::Error),
}
