//! Tokenizer errors
//!
//! Every error aborts the parse: there is no partial result. Each variant carries the
//! position of the tag that triggered it so callers can point at the source.

use crate::stache::range::Position;
use std::fmt;

/// Longest fragment of an unclosed tag shown in messages
const FRAGMENT_PREVIEW: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// An open delimiter with no close delimiter before the end of input
    UnclosedTag { fragment: String, at: Position },
    /// Input ended while a block was still open; names the innermost one
    UnclosedSection { name: String, at: Position },
    /// A close tag with no open block
    UnmatchedClose { name: String, at: Position },
    /// A close tag whose content differs from the innermost open block's content
    MismatchedClose {
        expected: String,
        found: String,
        at: Position,
    },
    /// A delimiter directive that does not split into exactly two markers
    MalformedDelimiterDirective { directive: String, at: Position },
    /// A non-comment tag with nothing inside
    EmptyTag { raw: String, at: Position },
}

impl TokenizeError {
    pub fn position(&self) -> Position {
        match self {
            TokenizeError::UnclosedTag { at, .. }
            | TokenizeError::UnclosedSection { at, .. }
            | TokenizeError::UnmatchedClose { at, .. }
            | TokenizeError::MismatchedClose { at, .. }
            | TokenizeError::MalformedDelimiterDirective { at, .. }
            | TokenizeError::EmptyTag { at, .. } => *at,
        }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.position();
        let (line, column) = (at.line + 1, at.column + 1);
        match self {
            TokenizeError::UnclosedTag { fragment, .. } => write!(
                f,
                "Unclosed tag at line {line}, column {column}: \"{}\"",
                preview(fragment)
            ),
            TokenizeError::UnclosedSection { name, .. } => write!(
                f,
                "Unclosed section '{name}' opened at line {line}, column {column}"
            ),
            TokenizeError::UnmatchedClose { name, .. } => write!(
                f,
                "Closing unopened section '{name}' at line {line}, column {column}"
            ),
            TokenizeError::MismatchedClose {
                expected, found, ..
            } => write!(
                f,
                "Mismatched close at line {line}, column {column}: expected '{expected}', found '{found}'"
            ),
            TokenizeError::MalformedDelimiterDirective { directive, .. } => write!(
                f,
                "Malformed delimiter directive at line {line}, column {column}: '{directive}' must be two markers separated by whitespace"
            ),
            TokenizeError::EmptyTag { raw, .. } => {
                write!(f, "Empty tag at line {line}, column {column}: \"{raw}\"")
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

impl From<TokenizeError> for String {
    fn from(err: TokenizeError) -> Self {
        err.to_string()
    }
}

fn preview(fragment: &str) -> String {
    if fragment.chars().count() > FRAGMENT_PREVIEW {
        let mut truncated: String = fragment.chars().take(FRAGMENT_PREVIEW).collect();
        truncated.push_str("...");
        truncated
    } else {
        fragment.to_string()
    }
}

/// Format source context around an error position
///
/// Shows 2 lines before the error, the error line with a >> marker, and 2 lines after.
/// Lines are numbered from 1.
pub fn format_source_context(source: &str, at: Position) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = at.line;

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}
