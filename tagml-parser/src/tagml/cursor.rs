//! Line array and immutable cursor positions
//!
//!     All parsing state is a pair of `Position` values bounding the region
//!     still to scan. A `Position` is a plain (line, offset) value: comparable,
//!     copyable, and never mutated in place. The shared line array lives in
//!     `Source`, which owns the escaped input lines plus the per-line indent
//!     table; every stepping and slicing operation is a pure method on `Source`
//!     that takes a position and returns a new one.
//!
//!     Offsets are byte offsets into the line (the scanner works on regex match
//!     boundaries); `next_char` steps by whole UTF-8 characters so positions
//!     always stay on character boundaries.
//!
//!     `(line_count, 0)` is the canonical end-of-input sentinel.

use crate::tagml::error::{ParseError, ParseResult};
use std::fmt;

/// A (line, offset) location inside a shared array of input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, offset: usize) -> Self {
        Position { line, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.offset)
    }
}

/// The input lines of one parse, plus the per-line indent table.
///
/// Lines are stored after the escaping pass, each with its trailing newline
/// if one was present. The indent of a line is its count of leading spaces,
/// or `None` for a blank line; a tab in leading whitespace is a hard error
/// caught at construction.
#[derive(Debug)]
pub struct Source {
    lines: Vec<String>,
    indents: Vec<Option<usize>>,
}

impl Source {
    pub fn new(lines: Vec<String>) -> ParseResult<Self> {
        let indents = lines
            .iter()
            .map(|line| leading_indent(line))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Source { lines, indents })
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Indent of a line; `None` when the line is blank or out of range.
    pub fn indent(&self, line: usize) -> Option<usize> {
        self.indents.get(line).copied().flatten()
    }

    /// Indent of the first non-blank line; the root fragment's base indent.
    pub fn first_content_indent(&self) -> usize {
        self.indents.iter().find_map(|i| *i).unwrap_or(0)
    }

    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// The canonical end-of-input sentinel.
    pub fn end(&self) -> Position {
        Position::new(self.lines.len(), 0)
    }

    /// Step one character forward, rolling over to the next line when the
    /// current line is exhausted.
    pub fn next_char(&self, pos: Position) -> Position {
        let Some(line) = self.line(pos.line) else {
            return Position::new(pos.line + 1, 0);
        };
        let start = pos.offset.min(line.len());
        let step = line[start..].chars().next().map_or(1, char::len_utf8);
        let offset = start + step;
        if offset >= line.len() {
            Position::new(pos.line + 1, 0)
        } else {
            Position::new(pos.line, offset)
        }
    }

    /// Step one character back, rolling over to the end of the previous line.
    pub fn prev_char(&self, pos: Position) -> Position {
        if pos.offset > 0 {
            let back = self
                .line(pos.line)
                .and_then(|line| line[..pos.offset.min(line.len())].chars().next_back())
                .map_or(1, char::len_utf8);
            return Position::new(pos.line, pos.offset.saturating_sub(back));
        }
        if pos.line == 0 {
            return pos;
        }
        let prev = pos.line - 1;
        let len = self.line(prev).map_or(0, str::len);
        Position::new(prev, len.saturating_sub(1))
    }

    pub fn next_line(&self, pos: Position) -> Position {
        Position::new(pos.line + 1, 0)
    }

    pub fn prev_line(&self, pos: Position) -> Position {
        Position::new(pos.line.saturating_sub(1), 0)
    }

    pub fn start_of_line(&self, pos: Position) -> Position {
        Position::new(pos.line, 0)
    }

    pub fn end_of_line(&self, pos: Position) -> Position {
        Position::new(pos.line, self.line(pos.line).map_or(0, str::len))
    }

    /// Character at `pos`, or `None` past the end of the line or input.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        let line = self.line(pos.line)?;
        line.get(pos.offset..)?.chars().next()
    }

    /// The current line from `pos` up to `stop` if `stop` is on the same line,
    /// else to the end of the line.
    pub fn clipped_line(&self, pos: Position, stop: Position) -> &str {
        let Some(line) = self.line(pos.line) else {
            return "";
        };
        let start = pos.offset.min(line.len());
        let end = if stop.line > pos.line {
            line.len()
        } else if stop.line == pos.line {
            stop.offset.min(line.len())
        } else {
            start
        };
        &line[start..end.max(start)]
    }

    /// Materialize the span between `start` and `stop` as clipped line
    /// fragments.
    pub fn lines_before(&self, start: Position, stop: Position) -> Vec<String> {
        let mut out = Vec::new();
        let mut pos = start;
        while pos < stop {
            out.push(self.clipped_line(pos, stop).to_string());
            pos = self.next_line(pos);
        }
        out
    }
}

/// Count of leading spaces, or `None` for a blank line. Tabs in leading
/// whitespace of a non-blank line are rejected unconditionally.
fn leading_indent(line: &str) -> ParseResult<Option<usize>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let mut indent = 0;
    let mut counting = true;
    for ch in line.chars() {
        if !ch.is_whitespace() {
            break;
        }
        if ch == '\t' {
            return Err(ParseError::with_line(
                "no tabs allowed in leading whitespace",
                line,
            ));
        }
        if counting && ch == ' ' {
            indent += 1;
        } else {
            counting = false;
        }
    }
    Ok(Some(indent))
}
