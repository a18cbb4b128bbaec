//! # stache
//!
//! A tokenizer for mustache-family templates.
//!
//! The tokenizer turns template source into a token tree plus the list of partials the
//! template references. It does not render: walking the tree against a data context is left to
//! whoever consumes it.
//!
//! File Layout
//!
//! src/stache
//!   ├── lexing     Delimiter-aware boundary and tag scanning
//!   ├── parsing    Token-tree builder and section stack
//!   ├── token      The data model (tokens, tags, delimiters)
//!   ├── loader     Loading templates and their partials from disk
//!   └── formats    Output formats (treeviz, json, yaml, source)
//!
//! For testing guidelines, see the [testing module](stache::testing).

pub mod stache;
