//! HTML / XML generator
//!
//! Renders elements as tags. Attributes left empty in the abbreviation become placeholders
//! named after the attribute, other values are written with `&` and `"` escaped. Void
//! elements close themselves (`<br>` in HTML, `<br/>` elsewhere), and host snippets get the
//! shorthand attributes merged into their first tag.
//!
//! Block content goes on its own indented lines; inline-only content stays on the line.

use super::{attribute_variable, quoted_value, Formatting, Generator};
use crate::zen::ast::Attribute;
use crate::zen::context::ContextKind;
use crate::zen::elements::{is_inline, is_void};
use crate::zen::expansion::{GenerationKind, GenerationNode};
use crate::zen::template::{TemplateFragment, ATTRS, END};

pub struct MarkupGenerator {
    formatting: Formatting,
}

impl MarkupGenerator {
    pub fn new(formatting: Formatting) -> Self {
        Self { formatting }
    }
}

impl Default for MarkupGenerator {
    fn default() -> Self {
        Self::new(Formatting::default())
    }
}

impl Generator for MarkupGenerator {
    fn name(&self) -> &str {
        "markup"
    }

    fn description(&self) -> &str {
        "HTML and XML tags"
    }

    fn suffix(&self) -> Option<&str> {
        Some("html")
    }

    fn is_applicable(&self, context: ContextKind, _wrapping: bool) -> bool {
        context.is_markup() || context == ContextKind::PlainText
    }

    fn is_default_for(&self, context: ContextKind) -> bool {
        context.is_markup()
    }

    fn accepts_snippet(&self, snippet: &TemplateFragment, has_attributes: bool) -> bool {
        !has_attributes || snippet.text().trim_start().starts_with('<')
    }

    fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    fn separator(&self, siblings: &[GenerationNode], formatting: &Formatting) -> String {
        if formatting.line_breaks && siblings.iter().any(is_block) {
            "\n".to_string()
        } else {
            String::new()
        }
    }

    fn shell(
        &self,
        node: &GenerationNode,
        context: ContextKind,
        _formatting: &Formatting,
    ) -> TemplateFragment {
        match &node.kind {
            GenerationKind::Text { text } => TemplateFragment::from_text(text.as_str()),
            GenerationKind::Element {
                snippet: Some(snippet),
                attributes,
                ..
            } => snippet_shell(snippet, attributes),
            GenerationKind::Element {
                key, attributes, ..
            } => element_shell(key, attributes, context),
        }
    }

    fn nest(
        &self,
        parent: &GenerationNode,
        children: TemplateFragment,
        formatting: &Formatting,
    ) -> TemplateFragment {
        let multiline = formatting.line_breaks
            && (parent.children.iter().any(is_block) || children.text().contains('\n'));
        if !multiline {
            return children;
        }
        let mut nested = children.indented(&formatting.indent);
        nested.prepend("\n");
        nested.push_str("\n");
        nested
    }
}

fn is_block(node: &GenerationNode) -> bool {
    node.key().is_some_and(|key| !is_inline(key))
}

fn push_attributes<'a>(
    fragment: &mut TemplateFragment,
    attributes: impl IntoIterator<Item = &'a Attribute>,
) {
    for attribute in attributes {
        fragment.push_str(&format!(" {}=\"", attribute.name));
        if attribute.value.is_empty() {
            fragment.push_placeholder(&attribute_variable(&attribute.name));
        } else {
            fragment.push_str(&quoted_value(&attribute.value));
        }
        fragment.push_str("\"");
    }
}

fn element_shell(key: &str, attributes: &[Attribute], context: ContextKind) -> TemplateFragment {
    let mut fragment = TemplateFragment::from_text(format!("<{key}"));
    push_attributes(&mut fragment, attributes);
    if is_void(key) {
        fragment.push_str(if context == ContextKind::Html { ">" } else { "/>" });
        fragment.push_placeholder(END);
    } else {
        fragment.push_str(">");
        fragment.push_placeholder(END);
        fragment.push_str(&format!("</{key}>"));
    }
    fragment
}

/// Merge shorthand attributes into a host snippet.
///
/// Attributes the first tag already declares fill that attribute's empty value; the rest go
/// to the `ATTRS` placeholder, or after the tag name when there is none.
fn snippet_shell(snippet: &TemplateFragment, attributes: &[Attribute]) -> TemplateFragment {
    let mut fragment = snippet.clone();
    if attributes.is_empty() {
        return fragment;
    }

    let missing: Vec<&Attribute> = attributes
        .iter()
        .filter(|attribute| !fill_declared(&mut fragment, attribute))
        .collect();
    if missing.is_empty() {
        return fragment;
    }

    let mut merged = TemplateFragment::new();
    push_attributes(&mut merged, missing);
    let at = match fragment.take_placeholder(ATTRS) {
        Some(at) => Some(at),
        None => tag_name_end(fragment.text()),
    };
    if let Some(at) = at {
        fragment.insert(at, merged);
    }
    fragment
}

/// Fill an attribute the snippet's first tag declares; false when it is not declared there.
fn fill_declared(fragment: &mut TemplateFragment, attribute: &Attribute) -> bool {
    let text = fragment.text();
    let first_tag = text.find('>').map_or(text, |end| &text[..end]);
    let needle = format!(" {}=\"", attribute.name);
    let Some(position) = first_tag.find(&needle) else {
        return false;
    };
    let value_at = position + needle.len();
    if attribute.value.is_empty() || !text[value_at..].starts_with('"') {
        return true;
    }

    let variable = fragment
        .placeholders()
        .iter()
        .find(|p| p.offset == value_at)
        .map(|p| p.name.clone());
    if let Some(variable) = variable {
        fragment.take_placeholder(&variable);
    }
    fragment.insert(value_at, TemplateFragment::from_text(quoted_value(&attribute.value)));
    true
}

fn tag_name_end(text: &str) -> Option<usize> {
    let rest = text.strip_prefix('<')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(rest.len());
    Some(end + 1)
}
