//! Property-based tests for the tokenizer
//!
//! Templates are generated as trees and rendered to source, remembering for every section
//! the exact text between its open and close tags. Tokenizing the rendered source must then
//! reproduce that text in the section's raw accumulator, in depth-first order.

use proptest::prelude::*;
use stache_parser::stache::parsing::{tokenize, Options};
use stache_parser::stache::token::Token;

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Var(String),
    Raw(String),
    Partial(String),
    Section(String, bool, Vec<Node>),
}

/// Literal text that cannot open a tag or pass for a balancing brace
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:;\\n\\r\\t-]{1,12}"
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,6}"
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        text_strategy().prop_map(Node::Text),
        name_strategy().prop_map(Node::Var),
        name_strategy().prop_map(Node::Raw),
        name_strategy().prop_map(Node::Partial),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        (
            name_strategy(),
            any::<bool>(),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(name, inverted, body)| Node::Section(name, inverted, body))
    })
}

/// Render nodes to source; records each section's inner text in depth-first order
fn render(nodes: &[Node], out: &mut String, raws: &mut Vec<String>, partials: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => out.push_str(&format!("{{{{{name}}}}}")),
            Node::Raw(name) => out.push_str(&format!("{{{{&{name}}}}}")),
            Node::Partial(name) => {
                partials.push(name.clone());
                out.push_str(&format!("{{{{>{name}}}}}"));
            }
            Node::Section(name, inverted, body) => {
                let sigil = if *inverted { '^' } else { '#' };
                out.push_str(&format!("{{{{{sigil}{name}}}}}"));

                let slot = raws.len();
                raws.push(String::new());
                let mut inner = String::new();
                render(body, &mut inner, raws, partials);
                raws[slot] = inner.clone();

                out.push_str(&inner);
                out.push_str(&format!("{{{{/{name}}}}}"));
            }
        }
    }
}

proptest! {
    #[test]
    fn text_without_tags_is_one_static_token(source in "[^{]{1,200}") {
        let template = tokenize(&source, &Options::default()).unwrap();
        prop_assert_eq!(template.tokens, vec![Token::Static(source.clone())]);
        prop_assert!(template.partials.is_empty());
    }

    #[test]
    fn section_raw_text_matches_source(nodes in prop::collection::vec(node_strategy(), 0..6)) {
        let mut source = String::new();
        let mut raws = Vec::new();
        let mut partials = Vec::new();
        render(&nodes, &mut source, &mut raws, &mut partials);

        let template = tokenize(&source, &Options::default()).unwrap();
        let actual: Vec<String> = template.sections().iter().map(|b| b.raw.clone()).collect();
        prop_assert_eq!(actual, raws);
    }

    #[test]
    fn partials_follow_source_order(nodes in prop::collection::vec(node_strategy(), 0..6)) {
        let mut source = String::new();
        let mut raws = Vec::new();
        let mut partials = Vec::new();
        render(&nodes, &mut source, &mut raws, &mut partials);

        let template = tokenize(&source, &Options::default()).unwrap();
        prop_assert_eq!(template.partials, partials);
    }
}
