//! Expansion engine
//!
//! Reduces an abbreviation tree to an ordered sequence of [GenerationNode]s.
//!
//! Operators
//!
//!     `Child` attaches the right side to every leaf element of the left side's expansion,
//!     expanding the right side once per leaf with that leaf's numbering and key (the key picks
//!     implicit tags). `Sibling` concatenates. `ClimbUp` lifts its right side one level: lifted
//!     nodes leave the `Child` they were expanded in and continue as siblings of its left
//!     side. A climbed-out part is emitted once, after the last leaf. Brackets keep climbs
//!     inside the group, and at the root there is nothing left to climb out of.
//!
//! Multiplication
//!
//!     A multiplied template or group is expanded once per copy, copy `i` of `n` getting
//!     `Numbering { index: i, total: n }`. Nested multipliers recompute the numbering per
//!     level. A node without its own multiplier inherits the numbering it was expanded with.
//!
//! Wrapped Text
//!
//!     Text being wrapped is trimmed first. A bare `*` makes one copy per non-empty line and
//!     puts each line into the final leaf of its copy. Otherwise [TextPlacement] decides: the
//!     whole text goes into the final leaf of the expansion, or one line per leaf element with
//!     any extra lines joining the last leaf. With no element to host it, the text becomes a
//!     trailing text node.

use crate::zen::ast::{Attribute, Group, Multiplier, Node, Operator, Template};
use crate::zen::elements::implicit_tag;
use crate::zen::numbering::Numbering;
use crate::zen::template::TemplateFragment;
use serde::{Deserialize, Serialize};

/// Where wrapped text goes when no `*` multiplier consumes it line by line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPlacement {
    /// The whole text in the final leaf of the expansion
    #[default]
    FinalLeaf,
    /// One line per leaf element
    PerLeaf,
}

/// What a generation node renders as
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GenerationKind {
    Element {
        key: String,
        attributes: Vec<Attribute>,
        #[serde(skip)]
        snippet: Option<TemplateFragment>,
    },
    Text {
        text: String,
    },
}

/// One concrete instance produced by expansion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationNode {
    pub kind: GenerationKind,
    pub numbering: Numbering,
    /// Slice of the wrapped text assigned to this instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GenerationNode>,
}

impl GenerationNode {
    pub fn element(key: impl Into<String>, numbering: Numbering) -> Self {
        Self {
            kind: GenerationKind::Element {
                key: key.into(),
                attributes: Vec::new(),
                snippet: None,
            },
            numbering,
            wrapped_text: None,
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>, numbering: Numbering) -> Self {
        Self {
            kind: GenerationKind::Text { text: text.into() },
            numbering,
            wrapped_text: None,
            children: Vec::new(),
        }
    }

    /// Element key, `None` for text
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            GenerationKind::Element { key, .. } => Some(key),
            GenerationKind::Text { .. } => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match &self.kind {
            GenerationKind::Element { attributes, .. } => attributes,
            GenerationKind::Text { .. } => &[],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn snippet(&self) -> Option<&TemplateFragment> {
        match &self.kind {
            GenerationKind::Element { snippet, .. } => snippet.as_ref(),
            GenerationKind::Text { .. } => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, GenerationKind::Element { .. })
    }

    /// An element with no element children
    pub fn is_leaf(&self) -> bool {
        self.is_element() && !self.children.iter().any(GenerationNode::is_element)
    }
}

/// Expand a tree into generation nodes.
///
/// `numbering` is the numbering of the whole expansion, [Numbering::single] outside of any
/// enclosing repetition.
pub fn expand(
    tree: &Node,
    numbering: Numbering,
    wrapped_text: Option<&str>,
    placement: TextPlacement,
) -> Vec<GenerationNode> {
    let wrapped = wrapped_text.map(str::trim).filter(|t| !t.is_empty());
    let mut expander = Expander {
        lines: wrapped.map(non_empty_lines).unwrap_or_default(),
        consumed: false,
    };

    let mut nodes: Vec<GenerationNode> = expander
        .node(tree, numbering, None)
        .into_iter()
        .map(|placed| placed.node)
        .collect();

    if let Some(text) = wrapped.filter(|_| !expander.consumed) {
        match placement {
            TextPlacement::FinalLeaf => host_text(&mut nodes, text.to_string(), numbering),
            TextPlacement::PerLeaf => distribute_lines(&mut nodes, &expander.lines, numbering),
        }
    }

    tracing::debug!(count = nodes.len(), "expanded abbreviation");
    nodes
}

/// An expanded node and how many levels it still has to climb
struct Placed {
    node: GenerationNode,
    climb: usize,
}

impl Placed {
    fn new(node: GenerationNode) -> Self {
        Self { node, climb: 0 }
    }
}

struct Expander {
    lines: Vec<String>,
    /// A `*` multiplier already placed the wrapped text
    consumed: bool,
}

impl Expander {
    fn node(&mut self, node: &Node, numbering: Numbering, parent: Option<&str>) -> Vec<Placed> {
        match node.multiplier() {
            Some(multiplier) => self.multiplied(node, multiplier, parent),
            None => self.single(node, numbering, parent),
        }
    }

    fn multiplied(
        &mut self,
        node: &Node,
        multiplier: Multiplier,
        parent: Option<&str>,
    ) -> Vec<Placed> {
        let total = match multiplier {
            Multiplier::Count(n) => n as usize,
            Multiplier::PerLine => self.lines.len().max(1),
        };
        let mut result = Vec::new();
        for index in 0..total {
            let numbering = Numbering::new(index, total);
            let mut copy = self.single(node, numbering, parent);
            if multiplier == Multiplier::PerLine {
                if let Some(line) = self.lines.get(index).cloned() {
                    host_line(&mut copy, line, numbering);
                }
            }
            result.extend(copy);
        }
        if multiplier == Multiplier::PerLine && !self.lines.is_empty() {
            self.consumed = true;
        }
        result
    }

    /// Expand `node` ignoring its multiplier
    fn single(&mut self, node: &Node, numbering: Numbering, parent: Option<&str>) -> Vec<Placed> {
        match node {
            Node::Template(template) => {
                vec![Placed::new(element(template, numbering, parent))]
            }
            Node::Text { text } => {
                vec![Placed::new(GenerationNode::text(
                    numbering.apply(text),
                    numbering,
                ))]
            }
            Node::Group(group) => self.group(group, numbering, parent),
            Node::Filtered { node, .. } => self.node(node, numbering, parent),
            Node::Empty => Vec::new(),
        }
    }

    fn group(&mut self, group: &Group, numbering: Numbering, parent: Option<&str>) -> Vec<Placed> {
        match (group.operator, group.children.as_slice()) {
            (Operator::Child, [left, right]) => self.child(left, right, numbering, parent),
            (Operator::Sibling, [left, right]) => {
                let mut items = self.node(left, numbering, parent);
                items.extend(self.node(right, numbering, parent));
                items
            }
            (Operator::ClimbUp, [left, right]) => {
                let mut items = self.node(left, numbering, parent);
                items.extend(self.node(right, numbering, None).into_iter().map(|placed| {
                    Placed {
                        climb: placed.climb + 1,
                        ..placed
                    }
                }));
                items
            }
            (_, children) => {
                let mut items = Vec::new();
                for child in children {
                    items.extend(self.node(child, numbering, parent));
                }
                for item in &mut items {
                    item.climb = 0;
                }
                items
            }
        }
    }

    fn child(
        &mut self,
        left: &Node,
        right: &Node,
        numbering: Numbering,
        parent: Option<&str>,
    ) -> Vec<Placed> {
        let mut items = self.node(left, numbering, parent);
        let total: usize = items.iter().map(|item| count_leaves(&item.node)).sum();
        if total == 0 {
            // nothing to nest into: `^a>b` or `{text}>b`
            items.extend(self.node(right, numbering, parent));
            return items;
        }

        let mut seen = 0;
        let mut escaped = Vec::new();
        for item in &mut items {
            self.attach(&mut item.node, right, total, &mut seen, &mut escaped);
        }
        items.extend(escaped.into_iter().map(|placed| Placed {
            climb: placed.climb - 1,
            ..placed
        }));
        items
    }

    fn attach(
        &mut self,
        node: &mut GenerationNode,
        right: &Node,
        total: usize,
        seen: &mut usize,
        escaped: &mut Vec<Placed>,
    ) {
        if !node.is_element() {
            return;
        }
        if !node.is_leaf() {
            for child in &mut node.children {
                self.attach(child, right, total, seen, escaped);
            }
            return;
        }

        *seen += 1;
        let key = node.key().map(str::to_string);
        for placed in self.node(right, node.numbering, key.as_deref()) {
            if placed.climb == 0 {
                node.children.push(placed.node);
            } else if *seen == total {
                escaped.push(placed);
            }
        }
    }
}

fn element(template: &Template, numbering: Numbering, parent: Option<&str>) -> GenerationNode {
    let key = match &template.key {
        Some(key) => numbering.apply(key),
        None => implicit_tag(parent).to_string(),
    };
    let attributes = template
        .attributes
        .iter()
        .map(|a| Attribute::new(numbering.apply(&a.name), numbering.apply(&a.value)))
        .collect();
    GenerationNode {
        kind: GenerationKind::Element {
            key,
            attributes,
            snippet: template.snippet.clone(),
        },
        numbering,
        wrapped_text: None,
        children: Vec::new(),
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn count_leaves(node: &GenerationNode) -> usize {
    if node.is_leaf() {
        1
    } else {
        node.children.iter().map(count_leaves).sum()
    }
}

/// The last element, descending through last element children
fn deepest_last(node: &mut GenerationNode) -> &mut GenerationNode {
    match node.children.iter().rposition(GenerationNode::is_element) {
        Some(index) => deepest_last(&mut node.children[index]),
        None => node,
    }
}

fn add_wrapped_text(node: &mut GenerationNode, text: String) {
    match &mut node.wrapped_text {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(&text);
        }
        None => node.wrapped_text = Some(text),
    }
}

fn host_text(nodes: &mut Vec<GenerationNode>, text: String, numbering: Numbering) {
    match nodes.iter().rposition(GenerationNode::is_element) {
        Some(index) => add_wrapped_text(deepest_last(&mut nodes[index]), text),
        None => nodes.push(GenerationNode::text(text, numbering)),
    }
}

fn host_line(copy: &mut Vec<Placed>, line: String, numbering: Numbering) {
    match copy.iter().rposition(|placed| placed.node.is_element()) {
        Some(index) => add_wrapped_text(deepest_last(&mut copy[index].node), line),
        None => copy.push(Placed::new(GenerationNode::text(line, numbering))),
    }
}

fn distribute_lines(nodes: &mut Vec<GenerationNode>, lines: &[String], numbering: Numbering) {
    let total: usize = nodes.iter().map(count_leaves).sum();
    if total == 0 {
        nodes.push(GenerationNode::text(lines.join("\n"), numbering));
        return;
    }
    let mut seen = 0;
    assign_lines(nodes, lines, total, &mut seen);
}

fn assign_lines(nodes: &mut [GenerationNode], lines: &[String], total: usize, seen: &mut usize) {
    for node in nodes.iter_mut().filter(|node| node.is_element()) {
        if !node.is_leaf() {
            assign_lines(&mut node.children, lines, total, seen);
            continue;
        }
        let index = *seen;
        *seen += 1;
        let text = if index + 1 == total {
            lines.get(index..).map(|rest| rest.join("\n"))
        } else {
            lines.get(index).cloned()
        };
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            add_wrapped_text(node, text);
        }
    }
}
