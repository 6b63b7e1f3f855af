//! `|c`: close elements that carry an id or a class with a marker comment
//!
//!     `div#page.wide` renders `<div id="page" class="wide"></div><!-- /#page.wide -->`.

use super::Filter;
use crate::zen::ast::{CLASS, ID};
use crate::zen::context::ContextKind;
use crate::zen::expansion::GenerationNode;
use crate::zen::template::TemplateFragment;

pub struct CommentFilter;

impl Filter for CommentFilter {
    fn suffix(&self) -> &str {
        "c"
    }

    fn is_applicable(&self, context: ContextKind) -> bool {
        context == ContextKind::Html
    }

    fn after_render(
        &self,
        mut fragment: TemplateFragment,
        node: &GenerationNode,
        _context: ContextKind,
    ) -> TemplateFragment {
        let mut selector = String::new();
        if let Some(id) = node.attribute(ID).filter(|id| !id.is_empty()) {
            selector.push('#');
            selector.push_str(id);
        }
        if let Some(classes) = node.attribute(CLASS) {
            for class in classes.split_whitespace() {
                selector.push('.');
                selector.push_str(class);
            }
        }
        if !selector.is_empty() {
            fragment.push_str(&format!("<!-- /{selector} -->"));
        }
        fragment
    }

    fn description(&self) -> &str {
        "Mark the end of elements with an id or a class"
    }
}
