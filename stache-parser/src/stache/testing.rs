//! Testing utilities for token trees
//!
//!     Tests that walk the token tree by hand get long fast: every level needs a match, an
//!     index and a panic arm, and the assertions that matter drown in boilerplate. They also
//!     break everywhere when a token's shape changes.
//!
//!     Use the fluent [assert_template] API instead. It checks the shape and content of whole
//!     hierarchies at once, and only the assertion implementation has to follow changes to the
//!     token types.
//!
//! Example
//!
//!     ```rust,ignore
//!     use stache_parser::stache::parsing::{tokenize, Options};
//!     use stache_parser::stache::testing::assert_template;
//!
//!     let template = tokenize("Hi {{#user}}{{name}}{{/user}}", &Options::default()).unwrap();
//!
//!     assert_template(&template)
//!         .item_count(2)
//!         .item(0, |item| {
//!             item.assert_static().text("Hi ");
//!         })
//!         .item(1, |item| {
//!             item.assert_section()
//!                 .name("user")
//!                 .raw("{{name}}")
//!                 .child_count(1)
//!                 .child(0, |child| {
//!                     child.assert_output().name("name").escaped(true);
//!                 });
//!         });
//!     ```

mod assertions;
mod matchers;

pub use assertions::{
    assert_template, BlockAssertion, OutputAssertion, PartialAssertion, StaticAssertion,
    TemplateAssertion, TokenAssertion,
};
pub use matchers::TextMatch;
