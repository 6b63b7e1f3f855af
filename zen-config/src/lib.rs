//! Shared configuration loader for the zen tools.
//!
//! `defaults/zen.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ZenConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use zen::zen::{BufferHost, ContextKind, Engine, Formatting, Registry, TextPlacement};

const DEFAULT_TOML: &str = include_str!("../defaults/zen.default.toml");

/// Top-level configuration consumed by zen applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ZenConfig {
    pub formatting: Formatting,
    pub expansion: ExpansionConfig,
    /// Alias keys (`ul+`) and the abbreviations they stand for
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Host snippets by key, in `$NAME$` placeholder syntax
    #[serde(default)]
    pub snippets: BTreeMap<String, Vec<String>>,
}

/// Expansion knobs that do not belong to a generator.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    pub context: ContextKind,
    pub text_placement: TextPlacement,
}

impl ZenConfig {
    /// Engine with the built-in generators rendering with the configured layout
    pub fn engine(&self) -> Engine {
        Engine::with_registry(Registry::with_formatting(self.formatting.clone()))
            .with_placement(self.expansion.text_placement)
    }

    /// Buffer host holding `text`, seeded with the configured snippets and aliases
    pub fn host(&self, context: ContextKind, text: impl Into<String>) -> BufferHost {
        let mut host = BufferHost::with_text(context, text);
        for (key, templates) in &self.snippets {
            for template in templates {
                host.add_snippet(key.as_str(), template.as_str());
            }
        }
        for (key, abbreviation) in &self.aliases {
            host.add_alias(key.as_str(), abbreviation.as_str());
        }
        host
    }
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
    pub fn build(self) -> Result<ZenConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ZenConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zen::zen::Expansion;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.formatting.indent, "\t");
        assert!(config.formatting.line_breaks);
        assert_eq!(config.expansion.context, ContextKind::Html);
        assert_eq!(config.expansion.text_placement, TextPlacement::FinalLeaf);
        assert_eq!(config.aliases.get("ul+").map(String::as_str), Some("ul>li"));
        assert_eq!(config.snippets.get("a").map(Vec::len), Some(1));
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("expansion.context", "haml")
            .expect("override to apply")
            .set_override("formatting.line_breaks", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.expansion.context, ContextKind::Haml);
        assert!(!config.formatting.line_breaks);
    }

    #[test]
    fn rejects_unknown_context() {
        let result = Loader::new()
            .set_override("expansion.context", "latex")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn engine_uses_configured_layout() {
        let config = Loader::new()
            .set_override("formatting.indent", "  ")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let mut host = config.host(ContextKind::Html, "ul>li");
        let expansion = config
            .engine()
            .expand("ul>li", &mut host)
            .expect("abbreviation to expand");
        assert!(matches!(expansion, Expansion::Inserted(_)));
        assert_eq!(host.text(), "<ul>\n  <li></li>\n</ul>");
    }

    #[test]
    fn host_knows_configured_snippets() {
        let config = load_defaults().expect("defaults to deserialize");
        let mut host = config.host(ContextKind::Html, "a");
        config
            .engine()
            .expand("a", &mut host)
            .expect("snippet to expand");
        assert_eq!(host.text(), "<a href=\"\"></a>");
    }
}
