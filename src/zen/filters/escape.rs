//! `|e`: escape markup so the expansion reads as text

use super::Filter;
use crate::zen::context::ContextKind;
use crate::zen::expansion::GenerationNode;
use crate::zen::template::TemplateFragment;

pub struct EscapeFilter;

impl Filter for EscapeFilter {
    fn suffix(&self) -> &str {
        "e"
    }

    fn is_applicable(&self, context: ContextKind) -> bool {
        context.is_markup()
    }

    fn after_render(
        &self,
        fragment: TemplateFragment,
        _node: &GenerationNode,
        _context: ContextKind,
    ) -> TemplateFragment {
        fragment.map_text(escape)
    }

    fn description(&self) -> &str {
        "Escape &, < and >"
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
