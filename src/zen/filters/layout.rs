//! Layout filters: `|s` keeps the output on one line, `|t` trims list markers from the
//! wrapped text.

use super::Filter;
use crate::zen::context::ContextKind;
use crate::zen::expansion::GenerationNode;
use crate::zen::generators::Formatting;
use once_cell::sync::Lazy;
use regex::Regex;

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]|[*\-\x{2022}])\s+").expect("list marker pattern")
});

pub struct SingleLineFilter;

impl Filter for SingleLineFilter {
    fn suffix(&self) -> &str {
        "s"
    }

    fn is_applicable(&self, _context: ContextKind) -> bool {
        true
    }

    fn adjust_formatting(&self, formatting: &mut Formatting) {
        formatting.line_breaks = false;
    }

    fn description(&self) -> &str {
        "Render on a single line"
    }
}

pub struct TrimFilter;

impl Filter for TrimFilter {
    fn suffix(&self) -> &str {
        "t"
    }

    fn is_applicable(&self, _context: ContextKind) -> bool {
        true
    }

    fn before_render(&self, mut node: GenerationNode, _context: ContextKind) -> GenerationNode {
        if let Some(text) = node.wrapped_text.take() {
            let trimmed: Vec<String> = text
                .lines()
                .map(|line| LIST_MARKER.replace(line, "").into_owned())
                .collect();
            node.wrapped_text = Some(trimmed.join("\n"));
        }
        node
    }

    fn description(&self) -> &str {
        "Strip list markers from wrapped lines"
    }
}
