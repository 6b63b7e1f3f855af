//! Template fragments
//!
//!     A [TemplateFragment] is text plus named placeholder positions (tab stops). Offsets are
//!     byte offsets into the fragment's own text, kept sorted; placeholders sharing a name
//!     are mirrors of one variable.
//!
//!     Fragments print in the `$NAME$` template syntax, with `$$` for a literal dollar sign,
//!     and [TemplateFragment::parse] reads the same syntax back. Host snippets are written in
//!     it.
//!
//! Reserved Names
//!
//!     [END] marks where the cursor lands when the template session ends. [ATTRS] marks where
//!     collected attributes go. Both stay singular in a composite template; see
//!     [assembling](crate::zen::assembling).

use serde::Serialize;
use std::fmt;

/// Cursor/end marker.
pub const END: &str = "END";
/// Collected-attributes marker.
pub const ATTRS: &str = "ATTRS";

/// A named position inside a fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub name: String,
    pub offset: usize,
}

/// Text with placeholder variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateFragment {
    text: String,
    placeholders: Vec<Placeholder>,
}

impl TemplateFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment holding plain text and no placeholders
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placeholders: Vec::new(),
        }
    }

    /// Parse `$NAME$` template syntax.
    ///
    /// `$$` is a literal `$`; a `$` that does not start a well-formed name is kept as text.
    pub fn parse(source: &str) -> Self {
        let mut fragment = Self::new();
        let mut rest = source;
        while let Some(start) = rest.find('$') {
            fragment.text.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            if let Some(tail) = after.strip_prefix('$') {
                fragment.text.push('$');
                rest = tail;
                continue;
            }
            match after.find('$') {
                Some(end) if is_variable_name(&after[..end]) => {
                    fragment.push_placeholder(&after[..end]);
                    rest = &after[end + 1..];
                }
                _ => {
                    fragment.text.push('$');
                    rest = after;
                }
            }
        }
        fragment.text.push_str(rest);
        fragment
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.placeholders.is_empty()
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Add a placeholder at the current end of the text
    pub fn push_placeholder(&mut self, name: &str) {
        self.placeholders.push(Placeholder {
            name: name.to_string(),
            offset: self.text.len(),
        });
    }

    /// Offset of the first placeholder called `name`
    pub fn placeholder_offset(&self, name: &str) -> Option<usize> {
        self.placeholders
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.offset)
    }

    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholder_offset(name).is_some()
    }

    /// Remove every placeholder called `name`, returning the offset of the first one
    pub fn take_placeholder(&mut self, name: &str) -> Option<usize> {
        let offset = self.placeholder_offset(name)?;
        self.placeholders.retain(|p| p.name != name);
        Some(offset)
    }

    /// Rename placeholders through `rename`
    pub fn rename_placeholders(&mut self, mut rename: impl FnMut(&str) -> String) {
        for placeholder in &mut self.placeholders {
            placeholder.name = rename(&placeholder.name);
        }
    }

    /// Append another fragment. Placeholders sitting at the current end stay before it.
    pub fn append(&mut self, other: TemplateFragment) {
        let at = self.text.len();
        self.insert(at, other);
    }

    /// Insert another fragment at byte offset `at`.
    ///
    /// Existing placeholders at exactly `at` stay in front of the inserted content.
    pub fn insert(&mut self, at: usize, other: TemplateFragment) {
        let shift = other.text.len();
        self.text.insert_str(at, &other.text);

        let split = self.placeholders.partition_point(|p| p.offset <= at);
        let tail: Vec<Placeholder> = self
            .placeholders
            .drain(split..)
            .map(|p| Placeholder {
                offset: p.offset + shift,
                ..p
            })
            .collect();
        self.placeholders
            .extend(other.placeholders.into_iter().map(|p| Placeholder {
                offset: p.offset + at,
                ..p
            }));
        self.placeholders.extend(tail);
    }

    /// Insert text at the start; every placeholder moves behind it.
    pub fn prepend(&mut self, text: &str) {
        self.text.insert_str(0, text);
        for placeholder in &mut self.placeholders {
            placeholder.offset += text.len();
        }
    }

    /// Transform the text between placeholders, keeping every placeholder between the same
    /// two pieces of text.
    pub fn map_text(&self, mut f: impl FnMut(&str) -> String) -> TemplateFragment {
        let mut result = TemplateFragment::new();
        let mut cursor = 0;
        for placeholder in &self.placeholders {
            if placeholder.offset > cursor {
                result.text.push_str(&f(&self.text[cursor..placeholder.offset]));
                cursor = placeholder.offset;
            }
            result.push_placeholder(&placeholder.name);
        }
        if cursor < self.text.len() || self.text.is_empty() {
            result.text.push_str(&f(&self.text[cursor..]));
        }
        result
    }

    /// Indent every line by `indent`
    pub fn indented(&self, indent: &str) -> TemplateFragment {
        let newline_indent = format!("\n{indent}");
        let mut result = self.map_text(|s| s.replace('\n', &newline_indent));
        result.prepend(indent);
        result
    }
}

impl fmt::Display for TemplateFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut placeholders = self.placeholders.iter().peekable();
        for (index, c) in self.text.char_indices() {
            while let Some(p) = placeholders.next_if(|p| p.offset <= index) {
                write!(f, "${}$", p.name)?;
            }
            if c == '$' {
                f.write_str("$$")?;
            } else {
                write!(f, "{c}")?;
            }
        }
        for p in placeholders {
            write!(f, "${}$", p.name)?;
        }
        Ok(())
    }
}

fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
