//! Filters
//!
//! A filter hooks into rendering without changing the shape of the expansion: it may rewrite
//! a node before its shell is drawn, rewrite the drawn shell, or adjust the layout settings.
//! Filters are requested with a `|suffix` segment, or apply by default in some contexts.

use crate::zen::context::ContextKind;
use crate::zen::expansion::GenerationNode;
use crate::zen::generators::Formatting;
use crate::zen::template::TemplateFragment;

pub mod comment;
pub mod escape;
pub mod layout;
pub mod xsl;

pub use comment::CommentFilter;
pub use escape::EscapeFilter;
pub use layout::{SingleLineFilter, TrimFilter};
pub use xsl::XslFilter;

/// Rendering hooks selected by suffix or by context
pub trait Filter: Send + Sync {
    /// Suffix naming this filter in an abbreviation (`e` for `|e`)
    fn suffix(&self) -> &str;

    fn is_applicable(&self, context: ContextKind) -> bool;

    fn is_default_for(&self, _context: ContextKind) -> bool {
        false
    }

    /// Rewrite a node before it is drawn
    fn before_render(&self, node: GenerationNode, _context: ContextKind) -> GenerationNode {
        node
    }

    /// Rewrite the drawn shell of a node
    fn after_render(
        &self,
        fragment: TemplateFragment,
        _node: &GenerationNode,
        _context: ContextKind,
    ) -> TemplateFragment {
        fragment
    }

    fn adjust_formatting(&self, _formatting: &mut Formatting) {}

    /// Optional description of this filter
    fn description(&self) -> &str {
        ""
    }
}
