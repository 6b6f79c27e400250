// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser turning a raw command line into a [`Command`]
//! tree.
//!
//! The grammar is small enough that lexing and parsing are fused into one
//! set of mutually recursive functions over a byte cursor, rather than
//! materializing an intermediate token stream: `parse_command_line` calls
//! `parse_single_command` calls `parse_argument`, and `parse_argument`
//! calls back into `parse_command_line` for `$(...)` and `` `...` ``
//! substitutions.

use crate::ast::{Argument, Command, Pipeline, SingleCommand};
use crate::error::{ParseError, ParseErrorReason};
use crate::span::Span;

/// Parse one command line.
///
/// Returns `Ok(None)` for input with nothing to execute (blank, or
/// comment-only once leading whitespace/comment is consumed). Returns
/// `Err` with the byte position and reason of the first structural
/// failure; no partial tree is ever handed back on that path.
pub fn parse(input: &str) -> Result<Option<Command>, ParseError> {
    let mut cur = Cursor::new(input);
    let result = parse_command_line(&mut cur)?;
    if cur.pos < cur.data.len() {
        return Err(ParseError::new(cur.pos, ParseErrorReason::InputLeft));
    }
    Ok(result)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    /// Set while inside a back-tick substitution; a nested `$(...)` is
    /// still permitted but a nested back-tick is not (it is read back as
    /// the closing delimiter instead).
    in_backtick: bool,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { data: input.as_bytes(), pos: 0, in_backtick: false }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn peek(&self) -> u8 {
        self.data[self.pos]
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn consume(&mut self) -> u8 {
        let b = self.data[self.pos];
        self.pos += 1;
        b
    }

    fn skip_ws(&mut self) {
        while !self.at_end() && self.peek().is_ascii_whitespace() {
            self.advance();
        }
    }
}

fn is_boundary(c: u8) -> bool {
    c <= b' ' || matches!(c, b'|' | b'<' | b'>' | b'&' | b')' | b'`')
}

/// `command_line := command ( ('|' | '&') command )*`
fn parse_command_line(cur: &mut Cursor) -> Result<Option<Command>, ParseError> {
    let start = cur.pos;
    let mut stages = Vec::new();
    loop {
        cur.skip_ws();
        if cur.at_end() {
            break;
        }
        let c = cur.peek();
        if c == b')' || (c == b'`' && cur.in_backtick) {
            break;
        }
        match parse_single_command(cur)? {
            Some(stage) => stages.push(stage),
            None => break,
        }
    }
    match stages.len() {
        0 => Ok(None),
        1 => Ok(Some(Command::Single(stages.remove(0)))),
        _ => {
            let background = stages.last().map(|s| s.background).unwrap_or(false);
            let span = stages
                .iter()
                .map(|s| s.span)
                .reduce(Span::merge)
                .unwrap_or_else(|| Span::new(start, cur.pos));
            Ok(Some(Command::Pipeline(Pipeline { stages, background, span })))
        }
    }
}

/// `command := argument+ ( '<' argument )? ( '>' argument )?`
///
/// Redirections and plain arguments may interleave in any order in the
/// source text (the historical implementation's inner loop re-checks for
/// an operator after consuming each redirection target); exactly one
/// input and one output redirection are accepted per stage regardless of
/// where they appear among the plain arguments.
fn parse_single_command(cur: &mut Cursor) -> Result<Option<SingleCommand>, ParseError> {
    let start = cur.pos;
    let mut args = Vec::new();
    let mut redir_in = None;
    let mut redir_out = None;
    let mut background = false;
    loop {
        cur.skip_ws();
        if cur.at_end() {
            break;
        }
        match cur.peek() {
            b'|' | b'&' => {
                let c = cur.consume();
                background = c == b'&';
                break;
            }
            b')' => break,
            b'`' if cur.in_backtick => break,
            b'<' => {
                if redir_in.is_some() {
                    return Err(ParseError::new(cur.pos, ParseErrorReason::DuplicatedInput));
                }
                cur.advance();
                redir_in = parse_argument(cur)?;
                if redir_in.is_none() {
                    return Err(ParseError::new(cur.pos, ParseErrorReason::UnknownSyntax));
                }
            }
            b'>' => {
                if redir_out.is_some() {
                    return Err(ParseError::new(cur.pos, ParseErrorReason::DuplicatedOutput));
                }
                cur.advance();
                redir_out = parse_argument(cur)?;
                if redir_out.is_none() {
                    return Err(ParseError::new(cur.pos, ParseErrorReason::UnknownSyntax));
                }
            }
            _ => match parse_argument(cur)? {
                Some(arg) => args.push(arg),
                None => break,
            },
        }
    }
    if args.is_empty() {
        return Ok(None);
    }
    let mut cmd = SingleCommand::new(args, Span::new(start, cur.pos));
    cmd.redir_in = redir_in;
    cmd.redir_out = redir_out;
    cmd.background = background;
    Ok(Some(cmd))
}

/// `argument := piece+`, pieces concatenating when not separated by
/// whitespace. A single resulting piece is returned unwrapped; two or
/// more become a [`Argument::Concatenation`].
fn parse_argument(cur: &mut Cursor) -> Result<Option<Argument>, ParseError> {
    cur.skip_ws();
    let mut pieces = Vec::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut quoted = false;
    loop {
        if cur.at_end() {
            break;
        }
        match cur.peek() {
            b'\\' => {
                cur.advance();
                if cur.at_end() {
                    return Err(ParseError::new(cur.pos, ParseErrorReason::UnknownSyntax));
                }
                buf.push(cur.consume());
            }
            b'"' => {
                flush(&mut pieces, &mut buf, quoted);
                quoted = !quoted;
                cur.advance();
            }
            b'$' => {
                flush(&mut pieces, &mut buf, quoted);
                cur.advance();
                if !cur.at_end() && cur.peek() == b'(' {
                    cur.advance();
                    pieces.push(parse_substitution(cur, quoted, b')')?);
                } else {
                    let name = scan_identifier(cur);
                    if name.is_empty() {
                        return Err(ParseError::new(cur.pos, ParseErrorReason::UnknownSyntax));
                    }
                    pieces.push(Argument::Variable(name, quoted));
                }
            }
            b'`' if !quoted && !cur.in_backtick => {
                flush(&mut pieces, &mut buf, quoted);
                cur.advance();
                cur.in_backtick = true;
                let sub = parse_substitution(cur, quoted, b'`');
                cur.in_backtick = false;
                pieces.push(sub?);
            }
            b'#' if !quoted => {
                cur.pos = cur.data.len();
                break;
            }
            c if !quoted && is_boundary(c) => {
                cur.skip_ws();
                break;
            }
            _ => buf.push(cur.consume()),
        }
    }
    flush(&mut pieces, &mut buf, quoted);
    if pieces.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Argument::concat(pieces)))
    }
}

fn flush(pieces: &mut Vec<Argument>, buf: &mut Vec<u8>, quoted: bool) {
    if !buf.is_empty() {
        let text = String::from_utf8_lossy(buf).into_owned();
        pieces.push(Argument::Literal(text, quoted));
        buf.clear();
    }
}

fn scan_identifier(cur: &mut Cursor) -> String {
    let mut buf = Vec::new();
    while !cur.at_end() {
        let c = cur.peek();
        if c.is_ascii_alphanumeric() || c == b'_' {
            buf.push(cur.consume());
        } else {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn parse_substitution(cur: &mut Cursor, quoted: bool, close: u8) -> Result<Argument, ParseError> {
    let inner = parse_command_line(cur)?;
    let cmd = match inner {
        Some(cmd) => cmd,
        None => return Err(ParseError::new(cur.pos, ParseErrorReason::UnmatchingDelimiters)),
    };
    if cur.at_end() || cur.peek() != close {
        return Err(ParseError::new(cur.pos, ParseErrorReason::UnmatchingDelimiters));
    }
    cur.advance();
    Ok(Argument::Substitution(Box::new(cmd), quoted))
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
