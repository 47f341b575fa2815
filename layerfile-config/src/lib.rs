//! Shared configuration loader for the Layerfile tooling.
//!
//! `defaults/layerfile.default.toml` is embedded into every binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`LayerfileConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/layerfile.default.toml");

/// Top-level configuration consumed by Layerfile applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerfileConfig {
    pub server: ServerConfig,
    pub highlighting: HighlightingConfig,
    pub logging: LoggingConfig,
}

/// Language server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub document_schemes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightingConfig {
    pub value_span: ValueSpanMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

/// How the value span of a compound `KEY<delimiter>VALUE` token is measured.
///
/// Both modes run to the end of the token text; they only disagree on where the value starts
/// when the delimiter repeats right after the key (`A==B`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueSpanMode {
    /// Start at the first occurrence of the second split segment, searched from the end of the
    /// key.
    #[default]
    AbsorbToEnd,
    /// Start right after the first delimiter match.
    Structural,
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

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LayerfileConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LayerfileConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.server.document_schemes, vec!["file".to_string()]);
        assert_eq!(config.highlighting.value_span, ValueSpanMode::AbsorbToEnd);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("highlighting.value_span", "structural")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.highlighting.value_span, ValueSpanMode::Structural);
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[server]\ndocument_schemes = [\"file\", \"untitled\"]").unwrap();

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.server.document_schemes, vec!["file", "untitled"]);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/layerfile.toml")
            .build()
            .expect("missing optional file is ignored");
        assert_eq!(config.highlighting.value_span, ValueSpanMode::AbsorbToEnd);
    }

    #[test]
    fn required_file_must_exist() {
        let result = Loader::new()
            .with_file("/nonexistent/layerfile.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_value_span_mode() {
        let result = Loader::new()
            .set_override("highlighting.value_span", "sideways")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
