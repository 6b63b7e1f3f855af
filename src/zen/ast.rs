//! Abbreviation tree
//!
//!     The parser produces a [Node] tree. Composition is a single [Group] variant whose
//!     [Operator] says how its children combine, so the expansion engine is one recursive
//!     evaluator with a match over four operator kinds.
//!
//!     Filters are kept as [Node::Filtered] decorators around the tree they apply to. They
//!     never change the shape of the expansion; selection reads them to pick the generator
//!     and the filter chain.

use crate::zen::template::TemplateFragment;
use serde::Serialize;

/// Attribute carrying the merged `.class` shorthands.
pub const CLASS: &str = "class";
/// Attribute set by the `#id` shorthand.
pub const ID: &str = "id";

/// A node of the abbreviation tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Template(Template),
    Text { text: String },
    Group(Group),
    Filtered { node: Box<Node>, suffix: String },
    /// Missing left operand of a leading `^`.
    Empty,
}

/// How a group combines its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    /// `a>b`: right side nested into every leaf of the left side
    Child,
    /// `a+b`
    Sibling,
    /// `a^b`: right side continues one level up
    ClimbUp,
    /// `(a)`: scopes a multiplier over a sub-tree
    Bracket,
}

/// Repetition requested by a `*` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Multiplier {
    /// `*n`
    Count(u32),
    /// Bare `*`: one copy per line of the wrapped text
    PerLine,
}

/// A named attribute collected from the shorthand chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Leaf naming an element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    /// `None` when the abbreviation starts with a shorthand (`.item`), the tag is then
    /// chosen from the parent during expansion.
    pub key: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Host template registered for the key, resolved at parse time.
    #[serde(skip)]
    pub snippet: Option<TemplateFragment>,
    pub multiplier: Option<Multiplier>,
}

impl Template {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key,
            attributes: Vec::new(),
            snippet: None,
            multiplier: None,
        }
    }

    /// Append a `.class` value; all classes share one attribute, in order.
    pub fn add_class(&mut self, class: &str) {
        match self.attributes.iter_mut().find(|a| a.name == CLASS) {
            Some(existing) if existing.value.is_empty() => existing.value = class.to_string(),
            Some(existing) => {
                existing.value.push(' ');
                existing.value.push_str(class);
            }
            None => self.attributes.push(Attribute::new(CLASS, class)),
        }
    }

    /// Set an attribute, replacing an earlier one with the same name in place.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }
}

/// Operator-composed children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub operator: Operator,
    pub children: Vec<Node>,
    pub multiplier: Option<Multiplier>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Node {
        Node::Text { text: text.into() }
    }

    pub fn binary(operator: Operator, left: Node, right: Node) -> Node {
        Node::Group(Group {
            operator,
            children: vec![left, right],
            multiplier: None,
        })
    }

    pub fn bracket(inner: Node) -> Node {
        Node::Group(Group {
            operator: Operator::Bracket,
            children: vec![inner],
            multiplier: None,
        })
    }

    pub fn filtered(node: Node, suffix: impl Into<String>) -> Node {
        Node::Filtered {
            node: Box::new(node),
            suffix: suffix.into(),
        }
    }

    /// Attach a multiplier to this node.
    ///
    /// Templates and groups carry it directly; anything else (a text leaf, or a node that
    /// already has one) is wrapped in a bracket group first.
    pub fn multiplied(self, multiplier: Multiplier) -> Node {
        match self {
            Node::Template(mut template) if template.multiplier.is_none() => {
                template.multiplier = Some(multiplier);
                Node::Template(template)
            }
            Node::Group(mut group) if group.multiplier.is_none() => {
                group.multiplier = Some(multiplier);
                Node::Group(group)
            }
            other => Node::Group(Group {
                operator: Operator::Bracket,
                children: vec![other],
                multiplier: Some(multiplier),
            }),
        }
    }

    /// The multiplier carried by this node, if any
    pub fn multiplier(&self) -> Option<Multiplier> {
        match self {
            Node::Template(t) => t.multiplier,
            Node::Group(g) => g.multiplier,
            _ => None,
        }
    }

    /// Filter suffixes from the outermost `|suffix` inwards
    pub fn filter_suffixes(&self) -> Vec<&str> {
        let mut suffixes = Vec::new();
        let mut node = self;
        while let Node::Filtered { node: inner, suffix } = node {
            suffixes.push(suffix.as_str());
            node = inner;
        }
        suffixes
    }

    /// The node below any filter decorators
    pub fn unfiltered(&self) -> &Node {
        let mut node = self;
        while let Node::Filtered { node: inner, .. } = node {
            node = inner;
        }
        node
    }
}
