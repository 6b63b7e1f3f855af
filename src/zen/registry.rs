//! Generator and filter registry
//!
//! Holds the pluggable strategies in explicit registration order. Lookups are "first match
//! wins", so registration order is part of the contract: earlier generators take precedence
//! as context defaults.

use crate::zen::context::ContextKind;
use crate::zen::filters::{
    CommentFilter, EscapeFilter, Filter, SingleLineFilter, TrimFilter, XslFilter,
};
use crate::zen::generators::{Formatting, Generator, HamlGenerator, MarkupGenerator};

/// Registry of generators and filters
pub struct Registry {
    generators: Vec<Box<dyn Generator>>,
    filters: Vec<Box<dyn Filter>>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Registry {
            generators: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Register a generator after the existing ones
    pub fn register_generator<G: Generator + 'static>(&mut self, generator: G) {
        self.generators.push(Box::new(generator));
    }

    /// Register a filter after the existing ones
    pub fn register_filter<F: Filter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    pub fn generators(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    pub fn filters(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    /// Get a generator by name
    pub fn generator(&self, name: &str) -> Option<&dyn Generator> {
        self.generators().find(|g| g.name() == name)
    }

    /// The first filter declaring `suffix`
    pub fn filter(&self, suffix: &str) -> Option<&dyn Filter> {
        self.filters().find(|f| f.suffix() == suffix)
    }

    /// First generator that applies here and is the default for the context
    pub fn default_generator(&self, context: ContextKind, wrapping: bool) -> Option<&dyn Generator> {
        self.generators()
            .find(|g| g.is_applicable(context, wrapping) && g.is_default_for(context))
    }

    /// Whether a `|suffix` segment means something in `context`: an applicable filter
    /// declares it, or a generator that applies in this context and mode does.
    pub fn accepts_suffix(&self, suffix: &str, context: ContextKind, wrapping: bool) -> bool {
        self.filters()
            .any(|f| f.suffix() == suffix && f.is_applicable(context))
            || self
                .generators()
                .any(|g| g.suffix() == Some(suffix) && g.is_applicable(context, wrapping))
    }

    /// Create a registry with the built-in generators and filters
    pub fn with_defaults() -> Self {
        Self::with_formatting(Formatting::default())
    }

    /// Built-in strategies rendering with the given layout
    pub fn with_formatting(formatting: Formatting) -> Self {
        let mut registry = Self::new();

        registry.register_generator(MarkupGenerator::new(formatting.clone()));
        registry.register_generator(HamlGenerator::new(formatting));

        registry.register_filter(EscapeFilter);
        registry.register_filter(CommentFilter);
        registry.register_filter(SingleLineFilter);
        registry.register_filter(TrimFilter);
        registry.register_filter(XslFilter);

        registry
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = Registry::new();
        assert_eq!(registry.generators().count(), 0);
        assert_eq!(registry.filters().count(), 0);
    }

    #[test]
    fn test_default_generators_per_context() {
        let registry = Registry::with_defaults();
        let name = |context, wrapping| {
            registry
                .default_generator(context, wrapping)
                .map(|g| g.name().to_string())
        };
        assert_eq!(name(ContextKind::Html, false).as_deref(), Some("markup"));
        assert_eq!(name(ContextKind::Xsl, true).as_deref(), Some("markup"));
        assert_eq!(name(ContextKind::Haml, false).as_deref(), Some("haml"));
        assert_eq!(name(ContextKind::Haml, true), None);
        assert_eq!(name(ContextKind::PlainText, false), None);
    }

    #[test]
    fn test_accepts_suffix() {
        let registry = Registry::with_defaults();
        assert!(registry.accepts_suffix("e", ContextKind::Html, false));
        assert!(registry.accepts_suffix("haml", ContextKind::Html, false));
        assert!(!registry.accepts_suffix("c", ContextKind::Xml, false));
        assert!(!registry.accepts_suffix("nope", ContextKind::Html, false));
    }

    #[test]
    fn test_generator_suffix_needs_an_applicable_generator() {
        let registry = Registry::with_defaults();
        assert!(!registry.accepts_suffix("haml", ContextKind::Html, true));
        assert!(!registry.accepts_suffix("html", ContextKind::Haml, false));
        assert!(registry.accepts_suffix("html", ContextKind::Xml, true));
    }

    #[test]
    fn test_lookup_by_name_and_suffix() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.generator("haml").and_then(|g| g.suffix()), Some("haml"));
        assert_eq!(registry.filter("s").map(|f| f.suffix()), Some("s"));
        assert!(registry.filter("html").is_none());
    }
}
