//! Shared configuration loader for the stache tools.
//!
//! `defaults/stache.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files and command-line
//! overrides on top of those defaults via [`Loader`] before deserializing into [`StacheConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/stache.default.toml");

/// Top-level configuration consumed by stache applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StacheConfig {
    pub parser: ParserConfig,
    pub output: OutputConfig,
    pub treeviz: TreevizConfig,
    pub partials: PartialsConfig,
}

/// Initial delimiter pair handed to the tokenizer.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreevizConfig {
    pub max_label_width: usize,
}

/// Where partial templates are looked up.
#[derive(Debug, Clone, Deserialize)]
pub struct PartialsConfig {
    pub directory: String,
    pub extension: String,
}

impl PartialsConfig {
    /// The configured directory, or `None` when partials sit next to the template
    pub fn directory(&self) -> Option<PathBuf> {
        if self.directory.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.directory))
        }
    }
}

/// Builds a [`StacheConfig`] from the embedded defaults plus whatever the caller layers on.
///
/// Later sources win, so a `--delimiters` override beats a `[parser]` table in a user file.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Seeded with `{{ }}` delimiters, treeviz output and partials next to the template.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a file the user named explicitly; `build` fails if it is missing.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a file that may not exist, such as a project's `stache.toml`.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key, e.g. `parser.open` or `partials.directory`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer and deserialize it.
    pub fn build(self) -> Result<StacheConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone, without any user file.
pub fn load_defaults() -> Result<StacheConfig, ConfigError> {
    Loader::new().build()
}
