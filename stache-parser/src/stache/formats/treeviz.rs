//! Treeviz formatter for token trees
//!
//! Treeviz draws the token tree one line per token, which makes nesting easy to scan. Each
//! level of nesting is drawn with box characters, followed by an icon and a label truncated to
//! 30 characters (configurable through the `max-label` param).
//!
//! Example:
//!
//!   ⧉ template (2 tokens, 1 partial)
//!   ├─ ◦ Hello
//!   └─ § items
//!     ├─ ƒ name
//!     └─ ⊕ row
//!
//! Icons
//!     Template: ⧉
//!     Static: ◦
//!     Output: ƒ
//!     RawOutput: ƒ! (unescaped output)
//!     Partial: ⊕
//!     Section: §
//!     InvertedSection: ¬

use super::registry::{FormatError, Formatter};
use crate::stache::token::{Template, Token};
use std::collections::HashMap;

const DEFAULT_MAX_LABEL: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(kind: &str) -> &'static str {
    match kind {
        "Template" => "⧉",
        "Static" => "◦",
        "Output" => "ƒ",
        "RawOutput" => "ƒ!",
        "Partial" => "⊕",
        "Section" => "§",
        "InvertedSection" => "¬",
        _ => "○",
    }
}

fn label(token: &Token) -> String {
    match token {
        // Keep one line per token
        Token::Static(text) => text.replace('\r', "␍").replace('\n', "↵"),
        _ => token
            .tag()
            .map(|tag| tag.expression.clone())
            .unwrap_or_default(),
    }
}

fn format_token(
    token: &Token,
    prefix: &str,
    is_last: bool,
    max_label: usize,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(token.kind_name()),
        truncate(&label(token), max_label)
    ));

    let children = token.children();
    if !children.is_empty() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        for (i, child) in children.iter().enumerate() {
            format_token(
                child,
                &child_prefix,
                i == children.len() - 1,
                max_label,
                output,
            );
        }
    }
}

pub fn to_treeviz_str(template: &Template) -> String {
    to_treeviz_str_with_params(template, &HashMap::new())
}

pub fn to_treeviz_str_with_params(template: &Template, params: &HashMap<String, String>) -> String {
    let max_label = params
        .get("max-label")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_LABEL);

    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    };
    let mut output = format!(
        "{} template ({}, {})\n",
        get_icon("Template"),
        plural(template.tokens.len(), "token"),
        plural(template.partials.len(), "partial")
    );

    for (i, token) in template.tokens.iter().enumerate() {
        format_token(
            token,
            "",
            i == template.tokens.len() - 1,
            max_label,
            &mut output,
        );
    }

    output
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        Ok(to_treeviz_str(template))
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::parsing::{tokenize, Options};

    fn treeviz(source: &str) -> String {
        to_treeviz_str(&tokenize(source, &Options::default()).unwrap())
    }

    #[test]
    fn test_nested_tree() {
        let output = treeviz("Hello{{#items}}{{name}}{{>row}}{{/items}}");
        insta::assert_snapshot!(output, @r"
        ⧉ template (2 tokens, 1 partial)
        ├─ ◦ Hello
        └─ § items
          ├─ ƒ name
          └─ ⊕ row
        ");
    }

    #[test]
    fn test_inner_levels_keep_vertical_bar() {
        let output = treeviz("{{^a}}{{{b}}}{{/a}}!\n");
        insta::assert_snapshot!(output, @r"
        ⧉ template (2 tokens, 0 partials)
        ├─ ¬ a
        │ └─ ƒ! b
        └─ ◦ !↵
        ");
    }

    #[test]
    fn test_label_truncation_param() {
        let template = tokenize("abcdefghij", &Options::default()).unwrap();
        let mut params = HashMap::new();
        params.insert("max-label".to_string(), "4".to_string());
        let output = to_treeviz_str_with_params(&template, &params);
        assert!(output.contains("◦ abcd…"));
    }
}
