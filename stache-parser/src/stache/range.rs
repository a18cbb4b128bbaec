//! Source positions for error reporting
//!
//! The tokenizer works on byte offsets into the template source. Errors and tooling want
//! line:column positions instead, so this module converts between the two.
//!
//! ## Types
//!
//! - [`Position`] - A line:column position in the template (both 0-based, column in bytes)
//! - [`SourceLocation`] - Byte offset to position conversion for one source string
//!
//! Conversion is only needed on error paths and in tooling, so the tokenizer never builds a
//! [`SourceLocation`] on the happy path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line and column in the template source
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate `offset` in `source` without keeping the line table around.
    pub fn locate(source: &str, offset: usize) -> Self {
        SourceLocation::new(source).byte_to_position(offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offset to line/column conversion for a single source string
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(pos, _)| pos + 1),
        );
        Self { line_starts }
    }

    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        Position::new(line, byte_offset - self.line_starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
