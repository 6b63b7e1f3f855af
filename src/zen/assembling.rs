//! Template assembling
//!
//! Stitches rendered fragments into one composite template.
//!
//! Placeholder Identity
//!
//!     Every fragment names its placeholders on its own, so the [TemplateBuilder] renames them
//!     into the composite's namespace while inserting:
//!
//!     - Ordinary names stay as they are the first time and get a counter afterwards
//!       (`HREF`, `HREF2`, `HREF3`). A fragment's mirrors share the new name.
//!     - `ATTRS` is one shared variable across the whole composite.
//!     - `END` stays singular. Inserting a fragment that has an `END` demotes the one already
//!       held to a numbered fallback stop (`__END1`, `__END2`), so the surviving `END` is the
//!       last one inserted. Fallback stops from nested builders are renumbered the same way.
//!
//!     The builder also records the absolute `END` offset of the first fragment that had one,
//!     which the host uses as the cursor target if the template session ends early.
//!
//!     Generators compose children with the same builder, which is why the surviving `END` of
//!     `ul>li*3` sits inside the third `li`.

use crate::zen::context::ContextKind;
use crate::zen::expansion::GenerationNode;
use crate::zen::filters::Filter;
use crate::zen::generators::Generator;
use crate::zen::template::{Placeholder, TemplateFragment, ATTRS, END};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

const FALLBACK_END: &str = "__END";

/// The assembled output handed to the host's template runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompositeTemplate {
    #[serde(flatten)]
    fragment: TemplateFragment,
    /// `END` offset of the first fragment that had one
    pub end_offset: Option<usize>,
}

impl CompositeTemplate {
    pub fn text(&self) -> &str {
        self.fragment.text()
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        self.fragment.placeholders()
    }

    /// Offset of the surviving `END` placeholder
    pub fn end(&self) -> Option<usize> {
        self.fragment.placeholder_offset(END)
    }

    pub fn fragment(&self) -> &TemplateFragment {
        &self.fragment
    }

    pub fn into_fragment(self) -> TemplateFragment {
        self.fragment
    }
}

impl fmt::Display for CompositeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.fragment, f)
    }
}

/// Builds a composite template fragment by fragment
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    fragment: TemplateFragment,
    used: HashSet<String>,
    fallbacks: usize,
    end_offset: Option<usize>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    pub fn push_str(&mut self, text: &str) {
        self.fragment.push_str(text);
    }

    /// Append a fragment, returning the absolute offset of its `END` if it has one
    pub fn insert(&mut self, mut fragment: TemplateFragment) -> Option<usize> {
        if fragment.has_placeholder(END) {
            self.demote_end();
        }

        let mut renamed: HashMap<String, String> = HashMap::new();
        fragment.rename_placeholders(|name| {
            if let Some(new_name) = renamed.get(name) {
                return new_name.clone();
            }
            let new_name = self.fresh_name(name);
            renamed.insert(name.to_string(), new_name.clone());
            new_name
        });

        let base = self.fragment.len();
        let end = fragment.placeholder_offset(END).map(|offset| base + offset);
        self.fragment.append(fragment);
        if self.end_offset.is_none() {
            self.end_offset = end;
        }
        end
    }

    pub fn build(self) -> CompositeTemplate {
        CompositeTemplate {
            fragment: self.fragment,
            end_offset: self.end_offset,
        }
    }

    fn demote_end(&mut self) {
        if !self.fragment.has_placeholder(END) {
            return;
        }
        let fallback = self.next_fallback();
        self.fragment.rename_placeholders(|name| {
            if name == END {
                fallback.clone()
            } else {
                name.to_string()
            }
        });
    }

    fn next_fallback(&mut self) -> String {
        self.fallbacks += 1;
        format!("{FALLBACK_END}{}", self.fallbacks)
    }

    fn fresh_name(&mut self, name: &str) -> String {
        if name == END || name == ATTRS {
            return name.to_string();
        }
        if name.starts_with(FALLBACK_END) {
            return self.next_fallback();
        }
        let mut candidate = name.to_string();
        let mut counter = 1;
        while self.used.contains(&candidate) {
            counter += 1;
            candidate = format!("{name}{counter}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Render every generation node and assemble the fragments.
///
/// Fragments are separated the way the generator separates siblings, with the layout the
/// filters asked for.
pub fn assemble(
    nodes: &[GenerationNode],
    generator: &dyn Generator,
    filters: &[&dyn Filter],
    context: ContextKind,
) -> CompositeTemplate {
    let mut formatting = generator.formatting().clone();
    for filter in filters {
        filter.adjust_formatting(&mut formatting);
    }
    let separator = generator.separator(nodes, &formatting);

    let mut builder = TemplateBuilder::new();
    for (index, node) in nodes.iter().enumerate() {
        if index > 0 {
            builder.push_str(&separator);
        }
        builder.insert(generator.render(node, filters, context));
    }

    let composite = builder.build();
    tracing::debug!(
        generator = generator.name(),
        len = composite.text().len(),
        placeholders = composite.placeholders().len(),
        "assembled template"
    );
    composite
}
