//! Detokenizer
//!
//! Rebuilds template text from a token tree using the default `{{ }}` delimiters. The result
//! tokenizes back to the same tree as long as the static text contains no `{{`, which can only
//! happen when the original template switched delimiters. Comments and delimiter directives
//! leave no tokens behind, so they are not reproduced.

use super::registry::{FormatError, Formatter};
use crate::stache::token::{Block, Template, Token, DEFAULT_CLOSE, DEFAULT_OPEN};

pub fn detokenize(template: &Template) -> String {
    let mut output = String::new();
    write_tokens(&template.tokens, &mut output);
    output
}

fn write_tokens(tokens: &[Token], output: &mut String) {
    for token in tokens {
        match token {
            Token::Static(text) => output.push_str(text),
            Token::Output { tag, escape: true } => write_tag(output, "", &tag.expression),
            Token::Output { tag, escape: false } => write_tag(output, "&", &tag.expression),
            Token::Partial(tag) => write_tag(output, ">", &tag.expression),
            Token::Section(block) => write_block(output, "#", block),
            Token::InvertedSection(block) => write_block(output, "^", block),
        }
    }
}

fn write_tag(output: &mut String, sigil: &str, expression: &str) {
    output.push_str(DEFAULT_OPEN);
    output.push_str(sigil);
    output.push_str(expression);
    output.push_str(DEFAULT_CLOSE);
}

fn write_block(output: &mut String, sigil: &str, block: &Block) {
    write_tag(output, sigil, &block.tag.expression);
    write_tokens(&block.body, output);
    write_tag(output, "/", &block.tag.expression);
}

pub struct SourceFormatter;

impl Formatter for SourceFormatter {
    fn name(&self) -> &str {
        "source"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        Ok(detokenize(template))
    }

    fn description(&self) -> &str {
        "Canonical template text with default delimiters"
    }
}
