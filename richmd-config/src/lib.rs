//! Shared configuration loader for the richmd toolchain.
//!
//! `defaults/richmd.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`RichmdConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use richmd_babel::{ListItemIndent, SerializeOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/richmd.default.toml");

/// Top-level configuration consumed by richmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RichmdConfig {
    pub markdown: MarkdownConfig,
    pub logging: LoggingConfig,
}

/// Mirrors the knobs exposed by the markdown serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub bullet: char,
    pub bullet_ordered: char,
    pub emphasis: char,
    pub strong: char,
    pub fence: char,
    pub rule: char,
    pub rule_repetition: usize,
    pub rule_spaces: bool,
    pub list_item_indent: ListItemIndent,
    pub increment_list_marker: bool,
}

impl MarkdownConfig {
    /// Reject markers the serializer cannot produce valid markdown with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_marker("markdown.bullet", self.bullet, &['*', '-', '+'])?;
        check_marker("markdown.bullet_ordered", self.bullet_ordered, &['.', ')'])?;
        check_marker("markdown.emphasis", self.emphasis, &['*', '_'])?;
        check_marker("markdown.strong", self.strong, &['*', '_'])?;
        check_marker("markdown.fence", self.fence, &['`', '~'])?;
        check_marker("markdown.rule", self.rule, &['*', '-', '_'])?;

        if !(3..=usize::from(u8::MAX)).contains(&self.rule_repetition) {
            return Err(ConfigError::Message(format!(
                "markdown.rule_repetition must be between 3 and {}, got {}",
                u8::MAX,
                self.rule_repetition
            )));
        }
        Ok(())
    }
}

fn check_marker(key: &str, value: char, allowed: &[char]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let allowed: Vec<String> = allowed.iter().map(|c| format!("'{c}'")).collect();
    Err(ConfigError::Message(format!(
        "{key} must be one of {}, got '{value}'",
        allowed.join(", ")
    )))
}

impl From<&MarkdownConfig> for SerializeOptions {
    fn from(config: &MarkdownConfig) -> Self {
        SerializeOptions {
            bullet: config.bullet,
            bullet_ordered: config.bullet_ordered,
            emphasis: config.emphasis,
            strong: config.strong,
            fence: config.fence,
            rule: config.rule,
            rule_repetition: u8::try_from(config.rule_repetition).unwrap_or(u8::MAX),
            rule_spaces: config.rule_spaces,
            list_item_indent: config.list_item_indent,
            increment_list_marker: config.increment_list_marker,
        }
    }
}

impl From<MarkdownConfig> for SerializeOptions {
    fn from(config: MarkdownConfig) -> Self {
        SerializeOptions::from(&config)
    }
}

/// Controls diagnostics written by richmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive used when `RUST_LOG` is unset, e.g. `"warn"` or
    /// `"richmd_babel=debug"`.
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize the resulting configuration and validate it.
    pub fn build(self) -> Result<RichmdConfig, ConfigError> {
        let config: RichmdConfig = self.builder.build()?.try_deserialize()?;
        config.markdown.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RichmdConfig, ConfigError> {
    Loader::new().build()
}
