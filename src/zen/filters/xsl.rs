//! XSL cleanup, applied by default in XSL documents
//!
//!     `xsl:variable` and `xsl:with-param` take their value either from a `select` attribute
//!     or from their content. Once an element got children, its `select` goes.

use super::Filter;
use crate::zen::context::ContextKind;
use crate::zen::expansion::{GenerationKind, GenerationNode};

const SELECT: &str = "select";
const VALUE_ELEMENTS: &[&str] = &["xsl:variable", "xsl:with-param"];

pub struct XslFilter;

impl Filter for XslFilter {
    fn suffix(&self) -> &str {
        "xsl"
    }

    fn is_applicable(&self, context: ContextKind) -> bool {
        matches!(context, ContextKind::Xml | ContextKind::Xsl)
    }

    fn is_default_for(&self, context: ContextKind) -> bool {
        context == ContextKind::Xsl
    }

    fn before_render(&self, mut node: GenerationNode, _context: ContextKind) -> GenerationNode {
        let has_content = !node.children.is_empty() || node.wrapped_text.is_some();
        if let GenerationKind::Element {
            key, attributes, ..
        } = &mut node.kind
        {
            if has_content && VALUE_ELEMENTS.contains(&key.to_ascii_lowercase().as_str()) {
                attributes.retain(|attribute| attribute.name != SELECT);
            }
        }
        node
    }

    fn description(&self) -> &str {
        "Drop select from xsl:variable and xsl:with-param with content"
    }
}
