//! Testing utilities for expansion assertions
//!
//! Expansion results are trees of [GenerationNode]s. Checking them with nested `match`es and
//! index juggling gets unreadable quickly, so tests use the fluent [assert_expansion] API
//! instead, which walks a whole expansion in one expression:
//!
//! ```rust-example
//! use crate::zen::testing::assert_expansion;
//!
//! assert_expansion(&nodes)
//!     .node_count(1)
//!     .node(0, |ul| {
//!         ul.key("ul")
//!             .child_count(3)
//!             .child(2, |li| li.key("li").number(3));
//!     });
//! ```
//!
//! Every failure message names the path to the offending node (`nodes[0].children[2]`).

use crate::zen::expansion::GenerationNode;

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for an expansion result
pub fn assert_expansion(nodes: &[GenerationNode]) -> ExpansionAssertion<'_> {
    ExpansionAssertion { nodes }
}

// ============================================================================
// Sequence Assertions
// ============================================================================

pub struct ExpansionAssertion<'a> {
    nodes: &'a [GenerationNode],
}

impl<'a> ExpansionAssertion<'a> {
    /// Assert the number of top-level nodes
    pub fn node_count(self, expected: usize) -> Self {
        let actual = self.nodes.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} nodes, found {}: [{}]",
            expected,
            actual,
            summarize(self.nodes)
        );
        self
    }

    /// Assert the keys of the top-level nodes (`#text` for text nodes)
    pub fn keys(self, expected: &[&str]) -> Self {
        assert_eq!(summarize_keys(self.nodes), expected, "Top-level keys differ");
        self
    }

    /// Assert on a specific node by index
    pub fn node<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.nodes.len(),
            "Node index {} out of bounds (expansion has {} nodes)",
            index,
            self.nodes.len()
        );
        assertion(NodeAssertion {
            node: &self.nodes[index],
            context: format!("nodes[{index}]"),
        });
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a GenerationNode,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    /// Assert the element key
    pub fn key(self, expected: &str) -> Self {
        assert_eq!(
            self.node.key(),
            Some(expected),
            "{}: expected element '{}'",
            self.context,
            expected
        );
        self
    }

    /// Assert this is a text node with the given text
    pub fn text(self, expected: &str) -> Self {
        match &self.node.kind {
            crate::zen::expansion::GenerationKind::Text { text } => assert_eq!(
                text, expected,
                "{}: text differs",
                self.context
            ),
            other => panic!("{}: expected text node, found {:?}", self.context, other),
        }
        self
    }

    /// Assert an attribute value
    pub fn attr(self, name: &str, expected: &str) -> Self {
        assert_eq!(
            self.node.attribute(name),
            Some(expected),
            "{}: attribute '{}' differs",
            self.context,
            name
        );
        self
    }

    /// Assert an attribute is absent
    pub fn no_attr(self, name: &str) -> Self {
        assert_eq!(
            self.node.attribute(name),
            None,
            "{}: attribute '{}' should be absent",
            self.context,
            name
        );
        self
    }

    /// Assert the 1-based copy number
    pub fn number(self, expected: usize) -> Self {
        assert_eq!(
            self.node.numbering.number(),
            expected,
            "{}: copy number differs",
            self.context
        );
        self
    }

    /// Assert the slice of wrapped text this node hosts
    pub fn wrapped_text(self, expected: Option<&str>) -> Self {
        assert_eq!(
            self.node.wrapped_text.as_deref(),
            expected,
            "{}: wrapped text differs",
            self.context
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.children.len();
        assert_eq!(
            actual,
            expected,
            "{}: expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.node.children)
        );
        self
    }

    /// Assert the keys of the children (`#text` for text nodes)
    pub fn child_keys(self, expected: &[&str]) -> Self {
        assert_eq!(
            summarize_keys(&self.node.children),
            expected,
            "{}: child keys differ",
            self.context
        );
        self
    }

    /// Assert on a child by index
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.node.children.len(),
            "{}: child index {} out of bounds ({} children)",
            self.context,
            index,
            self.node.children.len()
        );
        assertion(NodeAssertion {
            node: &self.node.children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }
}

fn summarize_keys(nodes: &[GenerationNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.key().unwrap_or("#text")).collect()
}

fn summarize(nodes: &[GenerationNode]) -> String {
    summarize_keys(nodes).join(", ")
}
