//! Haml generator
//!
//! `%tag.class#id{name: "value"}` lines, children on indented lines below their parent. A
//! `div` with a class or an id drops its `%div`. Haml has no inline text syntax for `{text}`
//! leaves and no place for wrapped text, so it never applies while wrapping.

use super::{attribute_variable, Formatting, Generator};
use crate::zen::ast::{Attribute, CLASS, ID};
use crate::zen::context::ContextKind;
use crate::zen::expansion::{GenerationKind, GenerationNode};
use crate::zen::template::{TemplateFragment, END};

pub struct HamlGenerator {
    formatting: Formatting,
}

impl HamlGenerator {
    pub fn new(formatting: Formatting) -> Self {
        Self { formatting }
    }
}

impl Default for HamlGenerator {
    fn default() -> Self {
        Self::new(Formatting::default())
    }
}

impl Generator for HamlGenerator {
    fn name(&self) -> &str {
        "haml"
    }

    fn description(&self) -> &str {
        "Haml element lines"
    }

    fn suffix(&self) -> Option<&str> {
        Some("haml")
    }

    fn is_applicable(&self, context: ContextKind, wrapping: bool) -> bool {
        !wrapping && (context.is_markup() || context == ContextKind::Haml)
    }

    fn is_default_for(&self, context: ContextKind) -> bool {
        context == ContextKind::Haml
    }

    fn supports_text(&self) -> bool {
        false
    }

    fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    fn separator(&self, _siblings: &[GenerationNode], _formatting: &Formatting) -> String {
        "\n".to_string()
    }

    fn shell(
        &self,
        node: &GenerationNode,
        _context: ContextKind,
        _formatting: &Formatting,
    ) -> TemplateFragment {
        match &node.kind {
            GenerationKind::Text { text } => TemplateFragment::from_text(text.as_str()),
            GenerationKind::Element {
                snippet: Some(snippet),
                ..
            } => snippet.clone(),
            GenerationKind::Element {
                key, attributes, ..
            } => element_line(key, attributes),
        }
    }

    fn nest(
        &self,
        _parent: &GenerationNode,
        children: TemplateFragment,
        formatting: &Formatting,
    ) -> TemplateFragment {
        let mut nested = children.indented(&formatting.indent);
        nested.prepend("\n");
        nested
    }
}

fn element_line(key: &str, attributes: &[Attribute]) -> TemplateFragment {
    let mut fragment = TemplateFragment::new();
    let mut shorthand = String::new();
    let mut hash: Vec<&Attribute> = Vec::new();

    for attribute in attributes {
        match attribute.name.as_str() {
            CLASS if !attribute.value.is_empty() => {
                for class in attribute.value.split_whitespace() {
                    shorthand.push('.');
                    shorthand.push_str(class);
                }
            }
            ID if !attribute.value.is_empty() && !attribute.value.contains(' ') => {
                shorthand.push('#');
                shorthand.push_str(&attribute.value);
            }
            _ => hash.push(attribute),
        }
    }

    if !(key.eq_ignore_ascii_case("div") && !shorthand.is_empty()) {
        fragment.push_str(&format!("%{key}"));
    }
    fragment.push_str(&shorthand);

    if !hash.is_empty() {
        fragment.push_str("{");
        for (index, attribute) in hash.into_iter().enumerate() {
            if index > 0 {
                fragment.push_str(", ");
            }
            fragment.push_str(&format!("{}: \"", attribute.name));
            if attribute.value.is_empty() {
                fragment.push_placeholder(&attribute_variable(&attribute.name));
            } else {
                fragment.push_str(&ruby_string(&attribute.value));
            }
            fragment.push_str("\"");
        }
        fragment.push_str("}");
    }
    fragment.push_placeholder(END);
    fragment
}

/// Body of a double-quoted Ruby string literal, with interpolation disabled
fn ruby_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zen::numbering::Numbering;

    fn element(key: &str, attributes: Vec<Attribute>) -> GenerationNode {
        let mut node = GenerationNode::element(key, Numbering::single());
        if let GenerationKind::Element {
            attributes: slot, ..
        } = &mut node.kind
        {
            *slot = attributes;
        }
        node
    }

    #[test]
    fn test_div_with_shorthands_drops_tag() {
        let node = element(
            "div",
            vec![Attribute::new("class", "a b"), Attribute::new("id", "main")],
        );
        assert_eq!(element_line("div", node.attributes()).to_string(), ".a.b#main$END$");
    }

    #[test]
    fn test_other_attributes_use_hash_syntax() {
        let line = element_line(
            "a",
            &[Attribute::new("href", ""), Attribute::new("title", "t")],
        );
        assert_eq!(line.to_string(), "%a{href: \"$HREF$\", title: \"t\"}$END$");
    }

    #[test]
    fn test_hash_values_are_ruby_strings() {
        let line = element_line(
            "a",
            &[Attribute::new("title", "say \"hi\" #{x}"), Attribute::new("href", "#top")],
        );
        assert_eq!(
            line.text(),
            "%a{title: \"say \\\"hi\\\" \\#{x}\", href: \"#top\"}"
        );
    }

    #[test]
    fn test_children_are_indented_lines() {
        let mut list = element("ul", vec![]);
        list.children.push(element("li", vec![]));
        let fragment = HamlGenerator::default().render(&list, &[], ContextKind::Haml);
        assert_eq!(fragment.to_string(), "%ul\n\t%li$END$");
    }

    #[test]
    fn test_not_applicable_while_wrapping() {
        let generator = HamlGenerator::default();
        assert!(generator.is_applicable(ContextKind::Html, false));
        assert!(!generator.is_applicable(ContextKind::Html, true));
        assert!(!generator.is_applicable(ContextKind::PlainText, false));
    }
}
