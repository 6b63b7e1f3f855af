//! Generators
//!
//! A generator renders one [GenerationNode] (and everything below it) into a
//! [TemplateFragment]. Generators are pluggable: the registry holds them in registration
//! order and selection picks exactly one per expansion.
//!
//! Rendering
//!
//!     The provided [Generator::render] drives the shared flow, per node:
//!
//!     1. Filter `before_render` hooks rewrite the node.
//!     2. The generator draws the node's shell, with an `END` placeholder where the children go.
//!     3. Filter `after_render` hooks rewrite the shell.
//!     4. Children (plus the wrapped text as a trailing text child) are rendered the same way,
//!        composed with a [TemplateBuilder] and laid out by [Generator::nest].
//!     5. The children replace the shell's `END`. They keep an `END` of their own, or get one
//!        after the last child, so the cursor ends up after the innermost content.
//!
//!     Generators only implement the shell, the layout and the capability predicates.

use crate::zen::assembling::TemplateBuilder;
use crate::zen::context::ContextKind;
use crate::zen::expansion::GenerationNode;
use crate::zen::filters::Filter;
use crate::zen::template::{TemplateFragment, END};
use serde::{Deserialize, Serialize};

pub mod haml;
pub mod markup;

pub use haml::HamlGenerator;
pub use markup::MarkupGenerator;

/// Output layout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formatting {
    /// One level of indentation
    pub indent: String,
    /// Put block content on its own lines
    pub line_breaks: bool,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            line_breaks: true,
        }
    }
}

/// Renders generation nodes into template fragments
pub trait Generator: Send + Sync {
    /// The name of this generator (e.g., "markup", "haml")
    fn name(&self) -> &str;

    /// Optional description of this generator
    fn description(&self) -> &str {
        ""
    }

    /// Filter suffix that requests this generator explicitly
    fn suffix(&self) -> Option<&str> {
        None
    }

    fn is_applicable(&self, context: ContextKind, wrapping: bool) -> bool;

    fn is_default_for(&self, context: ContextKind) -> bool;

    /// Whether `{text}` leaves make sense in this output language
    fn supports_text(&self) -> bool {
        true
    }

    /// Whether shorthand attributes can be merged into a host snippet
    fn accepts_snippet(&self, _snippet: &TemplateFragment, has_attributes: bool) -> bool {
        !has_attributes
    }

    fn formatting(&self) -> &Formatting;

    /// Text between sibling fragments
    fn separator(&self, siblings: &[GenerationNode], formatting: &Formatting) -> String;

    /// Draw a single node without its children
    fn shell(
        &self,
        node: &GenerationNode,
        context: ContextKind,
        formatting: &Formatting,
    ) -> TemplateFragment;

    /// Lay out the composed children of `parent`
    fn nest(
        &self,
        parent: &GenerationNode,
        children: TemplateFragment,
        formatting: &Formatting,
    ) -> TemplateFragment;

    /// Render a node and its whole subtree
    fn render(
        &self,
        node: &GenerationNode,
        filters: &[&dyn Filter],
        context: ContextKind,
    ) -> TemplateFragment {
        let mut formatting = self.formatting().clone();
        for filter in filters {
            filter.adjust_formatting(&mut formatting);
        }
        render_tree(self, node, filters, context, &formatting)
    }
}

fn render_tree<G: Generator + ?Sized>(
    generator: &G,
    node: &GenerationNode,
    filters: &[&dyn Filter],
    context: ContextKind,
    formatting: &Formatting,
) -> TemplateFragment {
    let node = filters
        .iter()
        .fold(node.clone(), |node, filter| filter.before_render(node, context));

    let shell = generator.shell(&node, context, formatting);
    let mut shell = filters.iter().fold(shell, |fragment, filter| {
        filter.after_render(fragment, &node, context)
    });

    let mut children = node.children.clone();
    if let Some(text) = &node.wrapped_text {
        children.push(GenerationNode::text(text.clone(), node.numbering));
    }
    if children.is_empty() {
        return shell;
    }

    let separator = generator.separator(&children, formatting);
    let mut builder = TemplateBuilder::new();
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            builder.push_str(&separator);
        }
        builder.insert(render_tree(generator, child, filters, context, formatting));
    }

    let mut composed = builder.build().into_fragment();
    if !composed.has_placeholder(END) {
        composed.push_placeholder(END);
    }
    let inner = generator.nest(&node, composed, formatting);
    match shell.take_placeholder(END) {
        Some(at) => shell.insert(at, inner),
        None => shell.append(inner),
    }
    shell
}

/// Attribute value made safe for a double-quoted markup attribute
pub(crate) fn quoted_value(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Placeholder name for an attribute left empty in the abbreviation
pub(crate) fn attribute_variable(name: &str) -> String {
    let mut variable: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if !variable.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        variable.insert(0, '_');
    }
    variable
}
