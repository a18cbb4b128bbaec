//! Fluent assertion API for token trees

use super::matchers::TextMatch;
use crate::stache::token::{Block, Tag, Template, Token};

/// One-line summary of a token sequence for failure messages
fn summarize(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t.tag() {
            Some(tag) => format!("{}({})", t.kind_name(), tag.expression),
            None => t.kind_name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn assert_template(template: &Template) -> TemplateAssertion<'_> {
    TemplateAssertion { template }
}

pub struct TemplateAssertion<'a> {
    template: &'a Template,
}

impl<'a> TemplateAssertion<'a> {
    /// Assert the number of top-level tokens
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.template.tokens.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} items, found {} items: [{}]",
            expected,
            actual,
            summarize(&self.template.tokens)
        );
        self
    }

    /// Assert on a top-level token by index
    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>),
    {
        let tokens = &self.template.tokens;
        assert!(
            index < tokens.len(),
            "Item index {} out of bounds (template has {} items)",
            index,
            tokens.len()
        );
        assertion(TokenAssertion {
            token: &tokens[index],
            context: format!("items[{index}]"),
        });
        self
    }

    /// Assert the exact partial list, in order
    pub fn partials(self, expected: &[&str]) -> Self {
        assert_eq!(self.template.partials, expected, "Partial list mismatch");
        self
    }
}

pub struct TokenAssertion<'a> {
    token: &'a Token,
    context: String,
}

impl<'a> TokenAssertion<'a> {
    pub fn assert_static(self) -> StaticAssertion<'a> {
        match self.token {
            Token::Static(text) => StaticAssertion {
                text,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Static, found {}",
                self.context,
                other.kind_name()
            ),
        }
    }

    pub fn assert_output(self) -> OutputAssertion<'a> {
        match self.token {
            Token::Output { tag, escape } => OutputAssertion {
                tag,
                escape: *escape,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Output, found {}",
                self.context,
                other.kind_name()
            ),
        }
    }

    pub fn assert_partial(self) -> PartialAssertion<'a> {
        match self.token {
            Token::Partial(tag) => PartialAssertion {
                tag,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Partial, found {}",
                self.context,
                other.kind_name()
            ),
        }
    }

    pub fn assert_section(self) -> BlockAssertion<'a> {
        match self.token {
            Token::Section(block) => BlockAssertion {
                block,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Section, found {}",
                self.context,
                other.kind_name()
            ),
        }
    }

    pub fn assert_inverted_section(self) -> BlockAssertion<'a> {
        match self.token {
            Token::InvertedSection(block) => BlockAssertion {
                block,
                context: self.context,
            },
            other => panic!(
                "{}: Expected InvertedSection, found {}",
                self.context,
                other.kind_name()
            ),
        }
    }
}

pub struct StaticAssertion<'a> {
    text: &'a str,
    context: String,
}

impl StaticAssertion<'_> {
    pub fn text(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(self.text, &self.context);
        self
    }

    pub fn text_starts_with(self, prefix: &str) -> Self {
        TextMatch::StartsWith(prefix.to_string()).assert(self.text, &self.context);
        self
    }

    pub fn text_contains(self, substring: &str) -> Self {
        TextMatch::Contains(substring.to_string()).assert(self.text, &self.context);
        self
    }
}

fn assert_name(tag: &Tag, expected: &str, context: &str) {
    assert_eq!(
        tag.name, expected,
        "{context}: Expected name {expected:?}, found {:?}",
        tag.name
    );
}

fn assert_expression(tag: &Tag, expected: &str, context: &str) {
    assert_eq!(
        tag.expression, expected,
        "{context}: Expected expression {expected:?}, found {:?}",
        tag.expression
    );
}

pub struct OutputAssertion<'a> {
    tag: &'a Tag,
    escape: bool,
    context: String,
}

impl OutputAssertion<'_> {
    pub fn name(self, expected: &str) -> Self {
        assert_name(self.tag, expected, &self.context);
        self
    }

    pub fn expression(self, expected: &str) -> Self {
        assert_expression(self.tag, expected, &self.context);
        self
    }

    pub fn escaped(self, expected: bool) -> Self {
        assert_eq!(
            self.escape, expected,
            "{}: Expected escape={}, found escape={}",
            self.context, expected, self.escape
        );
        self
    }
}

pub struct PartialAssertion<'a> {
    tag: &'a Tag,
    context: String,
}

impl PartialAssertion<'_> {
    pub fn name(self, expected: &str) -> Self {
        assert_name(self.tag, expected, &self.context);
        self
    }

    pub fn expression(self, expected: &str) -> Self {
        assert_expression(self.tag, expected, &self.context);
        self
    }
}

/// Assertions shared by sections and inverted sections
pub struct BlockAssertion<'a> {
    block: &'a Block,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_name(&self.block.tag, expected, &self.context);
        self
    }

    pub fn expression(self, expected: &str) -> Self {
        assert_expression(&self.block.tag, expected, &self.context);
        self
    }

    /// Assert the raw source text accumulated for the block
    pub fn raw(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.block.raw, &self.context);
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.block.body.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.block.body)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>),
    {
        let body = &self.block.body;
        assert!(
            index < body.len(),
            "{}: Child index {} out of bounds ({} children)",
            self.context,
            index,
            body.len()
        );
        assertion(TokenAssertion {
            token: &body[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }
}
