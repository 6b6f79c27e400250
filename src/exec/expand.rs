// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Argument evaluation: turns an [`Argument`] tree into an argv vector.
//!
//! Evaluation is the pure half of the process; running a command
//! substitution's child and capturing its output is not — callers supply a
//! `substitute` callback so this module stays free of fork/exec concerns.

use crate::ast::{Argument, Command};
use crate::exec::error::ExecError;

/// Evaluate one [`Argument`] node to its (text, quoted) pair, per the
/// resolver rules: literals copy, variables read the environment, a
/// substitution runs its nested command and captures stdout, and a
/// concatenation joins its pieces in order.
pub(crate) fn resolve(
    arg: &Argument,
    substitute: &mut impl FnMut(&Command) -> Result<String, ExecError>,
) -> Result<(String, bool), ExecError> {
    match arg {
        Argument::Literal(text, quoted) => Ok((text.clone(), *quoted)),
        Argument::Variable(name, quoted) => {
            Ok((std::env::var(name).unwrap_or_default(), *quoted))
        }
        Argument::Substitution(cmd, quoted) => {
            // The `substitute` callback (`run_substitution`) already strips
            // the single trailing newline at its own pipe-reading boundary.
            let captured = substitute(cmd)?;
            Ok((captured, *quoted))
        }
        Argument::Concatenation(parts) => {
            let mut text = String::new();
            let mut quoted = false;
            for (i, part) in parts.iter().enumerate() {
                let (piece, piece_quoted) = resolve(part, substitute)?;
                if i == 0 {
                    quoted = piece_quoted;
                }
                text.push_str(&piece);
            }
            Ok((text, quoted))
        }
        Argument::Invalid => Err(ExecError::ArgumentFailed(format!("{arg:?}"))),
    }
}

/// Evaluate a whole argument list into an argv vector, applying word
/// splitting and glob expansion to every unquoted result.
pub(crate) fn expand_to_words(
    args: &[Argument],
    substitute: &mut impl FnMut(&Command) -> Result<String, ExecError>,
) -> Result<Vec<String>, ExecError> {
    let mut words = Vec::new();
    for arg in args {
        let (text, quoted) = resolve(arg, substitute)?;
        if quoted {
            words.push(text);
            continue;
        }
        for field in text.split_ascii_whitespace() {
            words.extend(expand_field(field)?);
        }
    }
    Ok(words)
}

/// Evaluate a single argument to one redirection path: no splitting, no
/// globbing (a redirection target is used verbatim once resolved).
pub(crate) fn expand_path(
    arg: &Argument,
    substitute: &mut impl FnMut(&Command) -> Result<String, ExecError>,
) -> Result<String, ExecError> {
    let (text, _quoted) = resolve(arg, substitute)?;
    Ok(expand_tilde(&text))
}

/// Glob-expand one whitespace-delimited field. A field with no metacharacters,
/// or one whose pattern matches nothing, passes through unchanged — only a
/// malformed pattern is a hard failure (mirrors `GLOB_NOMAGIC`).
fn expand_field(field: &str) -> Result<Vec<String>, ExecError> {
    let expanded = expand_tilde(field);
    if !has_glob_metachars(&expanded) {
        return Ok(vec![expanded]);
    }
    let matches: Vec<String> = glob::glob(&expanded)
        .map_err(ExecError::GlobFailed)?
        .filter_map(Result::ok)
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    if matches.is_empty() {
        Ok(vec![expanded])
    } else {
        Ok(matches)
    }
}

fn has_glob_metachars(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

/// Expand a leading `~` to the invoking user's home directory.
fn expand_tilde(text: &str) -> String {
    if let Some(rest) = text.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Some(home) = dirs::home_dir() {
                return format!("{}{}", home.display(), rest);
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
