//! Token-tree builder
//!
//!     The builder drives the [lexer](crate::stache::lexing) in a loop that alternates between
//!     two states:
//!
//!         ScanningText: ask for the next open marker, emit the literal text before it.
//!         ScanningTag:  ask for the tag at that marker, dispatch on its sigil.
//!
//!     Parsing ends when a text scan finds no further open marker. At that point every block
//!     must be closed; otherwise the innermost open one is reported.
//!
//! Section Stack
//!
//!     Open blocks live on an explicit stack of owned frames. Each frame owns the body being
//!     filled for its block, so the "current token sequence" is simply the body of the top
//!     frame, or the template's top level when the stack is empty. Closing a block pops its
//!     frame and appends the finished block to whatever sequence is current after the pop.
//!
//!     Frames also accumulate the block's raw source text. Literal text and the raw text of
//!     every tag except comments is appended to all open frames, outer to inner, so each
//!     frame ends up holding exactly the source between its open and close tags.
//!
//! Matching
//!
//!     A close tag must repeat the full trimmed content of the open tag: `{{#each items}}`
//!     closes with `{{/each items}}`, not `{{/each}}`.
//!
//! Example
//!
//!     ```rust,ignore
//!     use stache_parser::stache::parsing::{tokenize, Options};
//!
//!     let template = tokenize("Hi {{#user}}{{name}}{{/user}}", &Options::default())?;
//!     assert_eq!(template.tokens.len(), 2);
//!     ```

use crate::stache::error::TokenizeError;
use crate::stache::lexing::{self, Sigil, TagScan};
use crate::stache::range::Position;
use crate::stache::token::{Block, BlockKind, Delimiters, Tag, Template, Token};

/// Per-call tokenizer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Initial delimiter pair, `{{ }}` when absent
    pub delimiters: Option<Delimiters>,
}

impl Options {
    pub fn with_delimiters(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            delimiters: Some(Delimiters::new(open, close)),
        }
    }
}

/// Tokenize a template into its token tree and partial list.
pub fn tokenize(source: &str, options: &Options) -> Result<Template, TokenizeError> {
    Builder::new(source, options).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ScanningText,
    /// Holds the offset of the open marker to scan
    ScanningTag(usize),
}

/// One open block
#[derive(Debug)]
struct Frame {
    kind: BlockKind,
    tag: Tag,
    body: Vec<Token>,
    raw: String,
    /// Offset of the block's open tag
    start: usize,
}

/// Stack of open blocks
#[derive(Debug, Default)]
struct SectionStack {
    frames: Vec<Frame>,
}

impl SectionStack {
    fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Append raw source text to every open block
    fn append_raw(&mut self, text: &str) {
        for frame in &mut self.frames {
            frame.raw.push_str(text);
        }
    }
}

struct Builder<'s> {
    source: &'s str,
    delimiters: Delimiters,
    root: Vec<Token>,
    sections: SectionStack,
    partials: Vec<String>,
    cursor: usize,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str, options: &Options) -> Self {
        let delimiters = options
            .delimiters
            .as_ref()
            .map(|d| Delimiters::new(d.open.as_str(), d.close.as_str()))
            .unwrap_or_default();

        Self {
            source,
            delimiters,
            root: Vec::new(),
            sections: SectionStack::default(),
            partials: Vec::new(),
            cursor: 0,
        }
    }

    fn run(mut self) -> Result<Template, TokenizeError> {
        let mut state = State::ScanningText;
        loop {
            match state {
                State::ScanningText => {
                    let scan = lexing::scan_text(self.source, self.cursor, &self.delimiters);
                    let text = &self.source[scan.text];
                    if !text.is_empty() {
                        self.sections.append_raw(text);
                        self.emit(Token::Static(text.to_string()));
                    }
                    match scan.tag_start {
                        Some(start) => state = State::ScanningTag(start),
                        None => break,
                    }
                }
                State::ScanningTag(start) => {
                    let tag = lexing::scan_tag(self.source, start, &self.delimiters)?;
                    self.cursor = tag.end;
                    self.dispatch(start, tag)?;
                    state = State::ScanningText;
                }
            }
        }

        self.finish()
    }

    fn finish(mut self) -> Result<Template, TokenizeError> {
        if let Some(frame) = self.sections.pop() {
            return Err(TokenizeError::UnclosedSection {
                name: frame.tag.name,
                at: self.position(frame.start),
            });
        }

        Ok(Template {
            tokens: self.root,
            partials: self.partials,
        })
    }

    fn dispatch(&mut self, start: usize, tag: TagScan<'s>) -> Result<(), TokenizeError> {
        // Directives and closes report their own errors for empty content
        match tag.sigil {
            Some(Sigil::Comment) => return Ok(()),
            Some(Sigil::Delimiters) => return self.change_delimiters(start, tag),
            Some(Sigil::Close) => return self.close_section(start, tag),
            _ => {}
        }
        if tag.content.is_empty() {
            return Err(TokenizeError::EmptyTag {
                raw: tag.raw.to_string(),
                at: self.position(start),
            });
        }

        match tag.sigil {
            None => self.emit_output(tag, true),
            Some(Sigil::Triple) | Some(Sigil::Unescaped) => self.emit_output(tag, false),
            Some(Sigil::Partial) | Some(Sigil::PartialAlt) => {
                self.partials.push(tag.content.to_string());
                self.sections.append_raw(tag.raw);
                self.emit(Token::Partial(Tag::new(tag.content)));
            }
            Some(Sigil::Section) => self.open_section(BlockKind::Section, start, tag),
            Some(Sigil::Inverted) => self.open_section(BlockKind::Inverted, start, tag),
            Some(Sigil::Comment) | Some(Sigil::Delimiters) | Some(Sigil::Close) => {}
        }
        Ok(())
    }

    fn emit_output(&mut self, tag: TagScan<'s>, escape: bool) {
        self.sections.append_raw(tag.raw);
        self.emit(Token::Output {
            tag: Tag::new(tag.content),
            escape,
        });
    }

    fn change_delimiters(&mut self, start: usize, tag: TagScan<'s>) -> Result<(), TokenizeError> {
        let pair = tag.content.strip_suffix('=').unwrap_or(tag.content);
        let delimiters =
            Delimiters::parse(pair).ok_or_else(|| TokenizeError::MalformedDelimiterDirective {
                directive: tag.content.to_string(),
                at: self.position(start),
            })?;

        tracing::debug!(from = %self.delimiters, to = %delimiters, "changing tag delimiters");
        self.sections.append_raw(tag.raw);
        self.delimiters = delimiters;
        Ok(())
    }

    fn open_section(&mut self, kind: BlockKind, start: usize, tag: TagScan<'s>) {
        tracing::trace!(expression = tag.content, ?kind, "opening section");
        self.sections.append_raw(tag.raw);
        self.sections.push(Frame {
            kind,
            tag: Tag::new(tag.content),
            body: Vec::new(),
            raw: String::new(),
            start,
        });
    }

    fn close_section(&mut self, start: usize, tag: TagScan<'s>) -> Result<(), TokenizeError> {
        let frame = self
            .sections
            .pop()
            .ok_or_else(|| TokenizeError::UnmatchedClose {
                name: Tag::new(tag.content).name,
                at: self.position(start),
            })?;

        if frame.tag.expression != tag.content {
            return Err(TokenizeError::MismatchedClose {
                expected: frame.tag.expression,
                found: tag.content.to_string(),
                at: self.position(start),
            });
        }

        tracing::trace!(expression = tag.content, "closing section");
        let block = Block {
            tag: frame.tag,
            body: frame.body,
            raw: frame.raw,
        };
        self.emit(Token::block(frame.kind, block));
        self.sections.append_raw(tag.raw);
        Ok(())
    }

    /// Append a token to the current sequence
    fn emit(&mut self, token: Token) {
        match self.sections.frames.last_mut() {
            Some(frame) => frame.body.push(token),
            None => self.root.push(token),
        }
    }

    fn position(&self, offset: usize) -> Position {
        Position::locate(self.source, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Template {
        tokenize(source, &Options::default()).expect("template to tokenize")
    }

    fn text(s: &str) -> Token {
        Token::Static(s.to_string())
    }

    #[test]
    fn test_plain_text_is_one_static_token() {
        let template = parse("Just text\r\nover lines");
        assert_eq!(template.tokens, vec![text("Just text\r\nover lines")]);
        assert!(template.partials.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let template = parse("");
        assert!(template.is_empty());
        assert!(template.partials.is_empty());
    }

    #[test]
    fn test_output_tokens() {
        let template = parse("Hi {{ user.name }}!");
        assert_eq!(
            template.tokens,
            vec![
                text("Hi "),
                Token::Output {
                    tag: Tag::new("user.name"),
                    escape: true
                },
                text("!"),
            ]
        );
    }

    #[test]
    fn test_nested_sections_compose() {
        let template = parse("{{#a}}{{#b}}x{{/b}}{{/a}}");
        assert_eq!(
            template.tokens,
            vec![Token::Section(Block {
                tag: Tag::new("a"),
                body: vec![Token::Section(Block {
                    tag: Tag::new("b"),
                    body: vec![text("x")],
                    raw: "x".to_string(),
                })],
                raw: "{{#b}}x{{/b}}".to_string(),
            })]
        );
    }

    #[test]
    fn test_inverted_section() {
        let template = parse("{{^empty}}none{{/empty}}");
        assert_eq!(
            template.tokens,
            vec![Token::InvertedSection(Block {
                tag: Tag::new("empty"),
                body: vec![text("none")],
                raw: "none".to_string(),
            })]
        );
    }

    #[test]
    fn test_comment_leaves_no_trace() {
        let template = parse("a{{! ignored }}b");
        assert_eq!(template.tokens, vec![text("a"), text("b")]);

        let template = parse("{{#s}}a{{!c}}b{{/s}}");
        let block = template.tokens[0].as_block().unwrap();
        assert_eq!(block.raw, "ab");
    }

    #[test]
    fn test_close_must_repeat_full_expression() {
        let template = parse("{{#each items}}x{{/each items}}");
        let block = template.tokens[0].as_block().unwrap();
        assert_eq!(block.tag.name, "each");
        assert_eq!(block.tag.expression, "each items");

        let err = tokenize("{{#each items}}x{{/each}}", &Options::default()).unwrap_err();
        assert_eq!(
            err,
            TokenizeError::MismatchedClose {
                expected: "each items".to_string(),
                found: "each".to_string(),
                at: Position::new(0, 16),
            }
        );
    }

    #[test]
    fn test_unclosed_section_names_innermost() {
        let err = tokenize("{{#outer}}\n  {{#inner}}", &Options::default()).unwrap_err();
        assert_eq!(
            err,
            TokenizeError::UnclosedSection {
                name: "inner".to_string(),
                at: Position::new(1, 2),
            }
        );
    }

    #[test]
    fn test_delimiter_directive_without_trailing_equals() {
        let template = parse("{{=<% %>}}<%x%>");
        assert_eq!(
            template.tokens,
            vec![Token::Output {
                tag: Tag::new("x"),
                escape: true
            }]
        );
    }

    #[test]
    fn test_initial_delimiters_from_options() {
        let template = tokenize("{{a}}[[b]]", &Options::with_delimiters("[[", "]]")).unwrap();
        assert_eq!(
            template.tokens,
            vec![
                text("{{a}}"),
                Token::Output {
                    tag: Tag::new("b"),
                    escape: true
                },
            ]
        );
    }

    #[test]
    fn test_empty_delimiters_in_options_fall_back() {
        let options = Options {
            delimiters: Some(Delimiters {
                open: String::new(),
                close: String::new(),
            }),
        };
        let template = tokenize("{{a}}", &options).unwrap();
        assert_eq!(template.tokens.len(), 1);
    }

    #[test]
    fn test_empty_tags_are_rejected() {
        for source in ["{{}}", "{{ }}", "{{#}}", "{{{}}}", "{{>  }}"] {
            let err = tokenize(source, &Options::default()).unwrap_err();
            assert!(
                matches!(err, TokenizeError::EmptyTag { .. }),
                "{source}: {err:?}"
            );
        }
        assert!(tokenize("{{!}}", &Options::default()).is_ok());
    }
}
