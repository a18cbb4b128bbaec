//! Token tree produced by the tokenizer
//!
//!     A template tokenizes into a flat sequence of tokens at the top level, where block
//!     sections own their body as a nested sequence. Comments and delimiter directives consume
//!     source but never become tokens.
//!
//! Tags
//!
//!     Every tag token carries a [Tag]: the full trimmed `expression` of the tag, and its
//!     `name`, which is the expression up to the first space. `{{#each items}}` has the name
//!     `each` and the expression `each items`. The name is the lookup key renderers use; the
//!     expression is what section open and close tags are matched on.
//!
//! Raw Section Text
//!
//!     Each [Block] keeps, next to its typed body, the raw source text of everything between
//!     its open and close tag, tag delimiters included. Comments are the one exception: they
//!     leave no trace in the raw text either. A renderer that decides not to evaluate a block
//!     can replay this text verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_OPEN: &str = "{{";
pub const DEFAULT_CLOSE: &str = "}}";

/// The open/close marker pair bounding tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    /// Build a pair. An empty marker falls back to its default.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        let open = open.into();
        let close = close.into();
        Self {
            open: if open.is_empty() {
                DEFAULT_OPEN.to_string()
            } else {
                open
            },
            close: if close.is_empty() {
                DEFAULT_CLOSE.to_string()
            } else {
                close
            },
        }
    }

    /// Parse a whitespace separated pair such as `<% %>`.
    ///
    /// Returns `None` unless the text splits into exactly two markers.
    pub fn parse(pair: &str) -> Option<Self> {
        let mut parts = pair.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(open), Some(close), None) => Some(Self::new(open, close)),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.open == DEFAULT_OPEN && self.close == DEFAULT_CLOSE
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN, DEFAULT_CLOSE)
    }
}

impl fmt::Display for Delimiters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.open, self.close)
    }
}

/// Name and full expression of a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub expression: String,
}

impl Tag {
    pub fn new(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        Self {
            name: name_of(&expression).to_string(),
            expression,
        }
    }
}

/// The part of a tag expression before its first space
pub fn name_of(expression: &str) -> &str {
    match expression.find(' ') {
        Some(index) => &expression[..index],
        None => expression,
    }
}

/// A section body together with its raw source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub tag: Tag,
    pub body: Vec<Token>,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Section,
    Inverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// Literal output text
    Static(String),
    /// A variable tag; `escape` is false for `{{{x}}}` and `{{&x}}`
    Output { tag: Tag, escape: bool },
    /// A reference to an externally resolved template
    Partial(Tag),
    Section(Block),
    InvertedSection(Block),
}

impl Token {
    pub fn block(kind: BlockKind, block: Block) -> Self {
        match kind {
            BlockKind::Section => Token::Section(block),
            BlockKind::Inverted => Token::InvertedSection(block),
        }
    }

    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Token::Static(_) => None,
            Token::Output { tag, .. } | Token::Partial(tag) => Some(tag),
            Token::Section(block) | Token::InvertedSection(block) => Some(&block.tag),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Token::Section(block) | Token::InvertedSection(block) => Some(block),
            _ => None,
        }
    }

    /// Nested tokens, empty for anything but sections
    pub fn children(&self) -> &[Token] {
        self.as_block().map(|b| b.body.as_slice()).unwrap_or(&[])
    }

    /// Short type name, used by formatters and test messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Static(_) => "Static",
            Token::Output { escape: true, .. } => "Output",
            Token::Output { escape: false, .. } => "RawOutput",
            Token::Partial(_) => "Partial",
            Token::Section(_) => "Section",
            Token::InvertedSection(_) => "InvertedSection",
        }
    }
}

/// Result of tokenizing one template
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Template {
    pub tokens: Vec<Token>,
    /// Partial expressions in source order, duplicates kept
    pub partials: Vec<String>,
}

impl Template {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Partial names (expression up to the first space) in first-seen order, without repeats
    pub fn partial_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.partials.iter().map(|p| name_of(p)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Depth-first walk over every section and inverted section
    pub fn sections(&self) -> Vec<&Block> {
        fn collect<'a>(tokens: &'a [Token], out: &mut Vec<&'a Block>) {
            for token in tokens {
                if let Some(block) = token.as_block() {
                    out.push(block);
                    collect(&block.body, out);
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.tokens, &mut out);
        out
    }
}
