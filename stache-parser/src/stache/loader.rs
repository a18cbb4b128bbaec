//! Template loading and partial resolution
//!
//! A renderer needs the token tree of every partial a template references before it can
//! resolve a `{{>name}}` token. `TemplateLoader` reads templates from a directory, one file per
//! template named `<name>.<extension>`, and tokenizes them with the same options.
//!
//! # Example
//!
//! ```rust,ignore
//! use stache_parser::stache::loader::TemplateLoader;
//!
//! let set = TemplateLoader::new("templates").load_with_partials("page")?;
//! for name in set.names() {
//!     println!("{name}");
//! }
//! ```

use crate::stache::error::TokenizeError;
use crate::stache::parsing::{tokenize, Options};
use crate::stache::token::Template;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_EXTENSION: &str = "mustache";

#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading a template file
    Io { path: PathBuf, message: String },
    /// The file was read but failed to tokenize
    Tokenize {
        path: PathBuf,
        source: String,
        error: TokenizeError,
    },
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Io { path, message } => {
                write!(f, "IO error reading {}: {}", path.display(), message)
            }
            LoaderError::Tokenize { path, error, .. } => {
                write!(f, "{}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

/// Templates loaded together, keyed by name
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    root: String,
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    /// Name of the template the set was loaded from
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Template names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

pub struct TemplateLoader {
    root: PathBuf,
    extension: String,
    options: Options,
}

impl TemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            options: Options::default(),
        }
    }

    /// File extension for templates, without the leading dot
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.root.join(name)
        } else {
            self.root.join(format!("{name}.{}", self.extension))
        }
    }

    /// Load and tokenize a single template
    pub fn load(&self, name: &str) -> Result<Template, LoaderError> {
        let path = self.path_for(name);
        let source = fs::read_to_string(&path).map_err(|e| LoaderError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(name, path = %path.display(), "tokenizing template");
        tokenize(&source, &self.options).map_err(|error| LoaderError::Tokenize {
            path,
            source,
            error,
        })
    }

    /// Load a template and, transitively, every partial it references
    ///
    /// Partials are looked up by name (the expression up to its first space). Each name is
    /// loaded once, so partials that include themselves terminate.
    pub fn load_with_partials(&self, name: &str) -> Result<TemplateSet, LoaderError> {
        let mut templates = BTreeMap::new();
        let mut queue = VecDeque::from([name.to_string()]);

        while let Some(next) = queue.pop_front() {
            if templates.contains_key(&next) {
                continue;
            }
            let template = self.load(&next)?;
            for partial in template.partial_names() {
                if !templates.contains_key(partial) {
                    queue.push_back(partial.to_string());
                }
            }
            templates.insert(next, template);
        }

        tracing::info!(root = name, loaded = templates.len(), "resolved partials");
        Ok(TemplateSet {
            root: name.to_string(),
            templates,
        })
    }
}
