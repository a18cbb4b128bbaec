//! Output formats for token trees
//!
//! Every format implements [Formatter] and is reachable by name through the
//! [FormatRegistry].
//!
//!     treeviz   One line per token, nesting drawn with box characters
//!     json      Pretty-printed serde_json
//!     yaml      serde_yaml
//!     source    Canonical template text rebuilt from the tokens

pub mod detokenizer;
pub mod registry;
pub mod serialized;
pub mod treeviz;

pub use detokenizer::{detokenize, SourceFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use serialized::{JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params, TreevizFormatter};
