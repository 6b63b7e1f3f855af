//! Document context an expansion happens in
//!
//! The context is only ever read: generators and filters use it to decide whether they apply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of document around the caret
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextKind {
    #[default]
    Html,
    Xml,
    Xsl,
    Haml,
    PlainText,
}

impl ContextKind {
    pub const ALL: [ContextKind; 5] = [
        ContextKind::Html,
        ContextKind::Xml,
        ContextKind::Xsl,
        ContextKind::Haml,
        ContextKind::PlainText,
    ];

    /// Tag-based documents (HTML and the XML family)
    pub fn is_markup(&self) -> bool {
        matches!(self, ContextKind::Html | ContextKind::Xml | ContextKind::Xsl)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContextKind::Html => "html",
            ContextKind::Xml => "xml",
            ContextKind::Xsl => "xsl",
            ContextKind::Haml => "haml",
            ContextKind::PlainText => "plain-text",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised context name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown context '{0}'")]
pub struct UnknownContext(pub String);

impl FromStr for ContextKind {
    type Err = UnknownContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownContext(s.to_string()))
    }
}
