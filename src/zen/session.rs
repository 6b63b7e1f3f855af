//! Expansion sessions
//!
//! [Engine] drives the whole pipeline against a [Host]: parse with the context's default
//! generator, select the generator and filters for the tree, expand, assemble and hand the
//! composite over.
//!
//! Expand
//!
//!     The typed key is replaced by the composite. When the key is a single template key the
//!     host itself has more than one template for, the choice is left to the host and nothing
//!     is expanded here.
//!
//! Wrap
//!
//!     The selection becomes the wrapped text and is replaced by the composite.
//!
//!     In both flows every fallible step runs before the document is touched, so a failed
//!     attempt leaves the host as it was.

use crate::zen::assembling::{assemble, CompositeTemplate};
use crate::zen::ast::Node;
use crate::zen::context::ContextKind;
use crate::zen::expansion::{expand, TextPlacement};
use crate::zen::host::{Host, TemplateLookup};
use crate::zen::numbering::Numbering;
use crate::zen::parsing::{parse_abbreviation, ParseContext, ParseError};
use crate::zen::registry::Registry;
use crate::zen::selection::{select_filters, select_generator, SelectionError};

/// Errors of a whole expansion attempt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    #[error("not a valid abbreviation: {0}")]
    Invalid(#[from] ParseError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("abbreviations do not apply in {0} context")]
    NotApplicable(ContextKind),
    #[error("nothing is selected")]
    NothingSelected,
}

impl ExpandError {
    /// Lex and parse failures: the text is simply not an abbreviation
    pub fn is_invalid_abbreviation(&self) -> bool {
        matches!(self, ExpandError::Invalid(_))
    }
}

/// Result of [Engine::expand]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The composite replaced the key
    Inserted(CompositeTemplate),
    /// The host expands the key with its own templates
    Deferred,
}

/// Abbreviation engine over a registry of generators and filters
pub struct Engine {
    registry: Registry,
    placement: TextPlacement,
}

impl Engine {
    /// Engine with the built-in generators and filters
    pub fn new() -> Self {
        Self::with_registry(Registry::with_defaults())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            placement: TextPlacement::default(),
        }
    }

    pub fn with_placement(mut self, placement: TextPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether any generator serves the host's context
    pub fn is_applicable<H: Host>(&self, host: &H, wrapping: bool) -> bool {
        self.registry
            .default_generator(host.context(), wrapping)
            .is_some()
    }

    /// Whether `key` parses as an abbreviation to wrap a selection with
    pub fn check_template_key<H: Host>(&self, key: &str, host: &H) -> bool {
        self.parse(key, host, host.context(), true).is_ok()
    }

    /// Expand the key typed in front of the caret
    pub fn expand<H: Host>(&self, key: &str, host: &mut H) -> Result<Expansion, ExpandError> {
        let context = host.context();
        let tree = self.parse(key, &*host, context, false)?;

        if let Node::Template(template) = &tree {
            if template.key.as_deref() == Some(key)
                && host.find_applicable_templates(key).len() > 1
            {
                tracing::debug!(key, "deferring to host templates");
                host.start_host_template(key);
                return Ok(Expansion::Deferred);
            }
        }

        let template = self.render(&tree, None, context)?;
        host.begin_edit();
        host.delete_template_key(key);
        host.start_template(template.clone());
        host.commit_edit();
        Ok(Expansion::Inserted(template))
    }

    /// Wrap the selection with `abbreviation`
    pub fn wrap<H: Host>(
        &self,
        abbreviation: &str,
        host: &mut H,
    ) -> Result<CompositeTemplate, ExpandError> {
        let selection = host.selected_text().ok_or(ExpandError::NothingSelected)?;
        let template =
            self.expand_to_template(abbreviation, Some(&selection), host.context(), &*host)?;
        host.begin_edit();
        host.delete_selection();
        host.start_template(template.clone());
        host.commit_edit();
        Ok(template)
    }

    /// Run the pipeline without a host session
    pub fn expand_to_template(
        &self,
        abbreviation: &str,
        wrapped: Option<&str>,
        context: ContextKind,
        lookup: &dyn TemplateLookup,
    ) -> Result<CompositeTemplate, ExpandError> {
        let tree = self.parse(abbreviation, lookup, context, wrapped.is_some())?;
        self.render(&tree, wrapped, context)
    }

    fn parse(
        &self,
        abbreviation: &str,
        lookup: &dyn TemplateLookup,
        context: ContextKind,
        wrapping: bool,
    ) -> Result<Node, ExpandError> {
        let generator = self
            .registry
            .default_generator(context, wrapping)
            .ok_or(ExpandError::NotApplicable(context))?;
        let parse_context = ParseContext::new(lookup, context)
            .with_generator(generator)
            .with_registry(&self.registry)
            .wrapping(wrapping);
        Ok(parse_abbreviation(abbreviation, &parse_context)?)
    }

    fn render(
        &self,
        tree: &Node,
        wrapped: Option<&str>,
        context: ContextKind,
    ) -> Result<CompositeTemplate, ExpandError> {
        let wrapping = wrapped.is_some();
        let generator = select_generator(tree, &self.registry, context, wrapping)?;
        let filters = select_filters(tree, &self.registry, context, generator)?;
        let nodes = expand(tree, Numbering::single(), wrapped, self.placement);
        Ok(assemble(&nodes, generator, &filters, context))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zen::host::{BufferHost, NoTemplates};

    #[test]
    fn test_expand_replaces_key() {
        let engine = Engine::new();
        let mut host = BufferHost::with_text(ContextKind::Html, "x p.a");
        let expansion = engine.expand("p.a", &mut host).unwrap();
        assert!(matches!(expansion, Expansion::Inserted(_)));
        assert_eq!(host.text(), "x <p class=\"a\"></p>");
        assert_eq!(host.caret(), 15);
        assert!(!host.in_edit());
    }

    #[test]
    fn test_invalid_abbreviation_leaves_buffer_alone() {
        let engine = Engine::new();
        let mut host = BufferHost::with_text(ContextKind::Html, "div{x");
        let error = engine.expand("div{x", &mut host).unwrap_err();
        assert!(error.is_invalid_abbreviation());
        assert_eq!(host.text(), "div{x");
    }

    #[test]
    fn test_ambiguous_key_defers_to_host() {
        let engine = Engine::new();
        let mut host = BufferHost::with_text(ContextKind::Html, "a");
        host.add_snippet("a", "<a href=\"$HREF$\">$END$</a>");
        host.add_snippet("a", "<abbr>$END$</abbr>");
        assert_eq!(engine.expand("a", &mut host), Ok(Expansion::Deferred));
        assert_eq!(host.host_expansions(), &["a".to_string()]);
        assert_eq!(host.text(), "a");
    }

    #[test]
    fn test_not_applicable_in_plain_text() {
        let engine = Engine::new();
        let host = BufferHost::new(ContextKind::PlainText);
        assert!(!engine.is_applicable(&host, false));
        assert_eq!(
            engine.expand_to_template("p", None, ContextKind::PlainText, &NoTemplates),
            Err(ExpandError::NotApplicable(ContextKind::PlainText))
        );
    }

    #[test]
    fn test_wrap_requires_selection() {
        let engine = Engine::new();
        let mut host = BufferHost::with_text(ContextKind::Html, "text");
        assert_eq!(
            engine.wrap("p", &mut host),
            Err(ExpandError::NothingSelected)
        );
    }
}
