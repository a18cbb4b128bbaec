//! Delimiter-aware lexer
//!
//!     The lexer answers two questions for the builder, always relative to the delimiter pair
//!     it is handed:
//!
//!         1. Text mode: where is the next open marker? Everything before it is literal text.
//!         2. Tag mode: given an open marker at some offset, what sigil, content and raw text
//!            does that tag have, and where does the source continue after it?
//!
//!     The lexer keeps no state of its own. Delimiters change mid-stream (`{{=<% %>=}}`), so
//!     they are passed in on every call rather than fixed at construction, and both scans are
//!     plain forward searches for the literal marker strings.
//!
//! Offsets
//!
//!     Both scans work on byte offsets into the original source, and every slice they return
//!     borrows from it. Literal text is therefore always byte-identical to the input, line
//!     endings included.
//!
//! The Balancing Brace
//!
//!     `{{{name}}}` is shorthand for `{{&name}}`. The third closing brace is tolerated for any
//!     tag: with the default delimiters the first `}}` found is the balancing brace plus half
//!     of the close marker, so a `}` right after the match extends the tag by one byte. With
//!     other delimiters the brace shows up at the end of the inner text and is dropped there.

use crate::stache::error::TokenizeError;
use crate::stache::range::Position;
use crate::stache::token::Delimiters;
use std::ops::Range;

/// The type marker following a tag's open delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigil {
    /// `#`
    Section,
    /// `^`
    Inverted,
    /// `/`
    Close,
    /// `=`
    Delimiters,
    /// `!`
    Comment,
    /// `>`
    Partial,
    /// `<`
    PartialAlt,
    /// `&`
    Unescaped,
    /// `{`
    Triple,
}

impl Sigil {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Sigil::Section),
            '^' => Some(Sigil::Inverted),
            '/' => Some(Sigil::Close),
            '=' => Some(Sigil::Delimiters),
            '!' => Some(Sigil::Comment),
            '>' => Some(Sigil::Partial),
            '<' => Some(Sigil::PartialAlt),
            '&' => Some(Sigil::Unescaped),
            '{' => Some(Sigil::Triple),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sigil::Section => '#',
            Sigil::Inverted => '^',
            Sigil::Close => '/',
            Sigil::Delimiters => '=',
            Sigil::Comment => '!',
            Sigil::Partial => '>',
            Sigil::PartialAlt => '<',
            Sigil::Unescaped => '&',
            Sigil::Triple => '{',
        }
    }
}

/// Result of a text-mode scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextScan {
    /// Literal text before the next open marker (or up to the end of input)
    pub text: Range<usize>,
    /// Offset of the next open marker, `None` once no tags remain
    pub tag_start: Option<usize>,
}

/// Result of a tag-mode scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagScan<'s> {
    pub sigil: Option<Sigil>,
    /// Sigil-stripped, whitespace-trimmed content
    pub content: &'s str,
    /// Whole tag, open marker through close marker
    pub raw: &'s str,
    /// Offset where scanning resumes
    pub end: usize,
}

/// Find the next open marker at or after `from`.
pub fn scan_text(source: &str, from: usize, delimiters: &Delimiters) -> TextScan {
    match source[from..].find(delimiters.open.as_str()) {
        Some(index) => TextScan {
            text: from..from + index,
            tag_start: Some(from + index),
        },
        None => TextScan {
            text: from..source.len(),
            tag_start: None,
        },
    }
}

/// Scan the tag whose open marker starts at `tag_start`.
pub fn scan_tag<'s>(
    source: &'s str,
    tag_start: usize,
    delimiters: &Delimiters,
) -> Result<TagScan<'s>, TokenizeError> {
    let body_start = tag_start + delimiters.open.len();
    let after_open = &source[body_start..];

    let close_at = after_open
        .find(delimiters.close.as_str())
        .ok_or_else(|| TokenizeError::UnclosedTag {
            fragment: source[tag_start..].to_string(),
            at: Position::locate(source, tag_start),
        })?;

    let mut inner = &after_open[..close_at];
    let mut end = body_start + close_at + delimiters.close.len();
    if delimiters.close.starts_with('}') && source[end..].starts_with('}') {
        end += 1;
    } else if let Some(stripped) = inner.strip_suffix('}') {
        inner = stripped;
    }

    let inner = inner.trim_start();
    let (sigil, content) = match inner.chars().next().and_then(Sigil::from_char) {
        Some(sigil) => (Some(sigil), &inner[1..]),
        None => (None, inner),
    };

    Ok(TagScan {
        sigil,
        content: content.trim(),
        raw: &source[tag_start..end],
        end,
    })
}
