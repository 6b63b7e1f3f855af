//! HTML element tables
//!
//!     Expansion uses the inline set to pick implicit tags; the markup generator uses both
//!     tables for layout and self-closing. Lookups are case-insensitive.

/// Phrasing elements, laid out on the same line as their siblings.
pub const INLINE: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "br", "button", "cite", "code", "del", "dfn",
    "em", "font", "i", "img", "input", "ins", "kbd", "label", "map", "object", "q", "s",
    "samp", "select", "small", "span", "strike", "strong", "sub", "sup", "textarea", "tt",
    "u", "var",
];

/// Elements without content or a closing tag.
pub const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn contains(table: &[&str], tag: &str) -> bool {
    table.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn is_inline(tag: &str) -> bool {
    contains(INLINE, tag)
}

pub fn is_void(tag: &str) -> bool {
    contains(VOID, tag)
}

/// Tag used for an element written without a name (`.item`), chosen from its parent
pub fn implicit_tag(parent: Option<&str>) -> &'static str {
    let Some(parent) = parent else {
        return "div";
    };
    match parent.to_ascii_lowercase().as_str() {
        "ul" | "ol" => "li",
        "table" | "tbody" | "thead" | "tfoot" => "tr",
        "tr" => "td",
        "select" | "optgroup" => "option",
        other if is_inline(other) => "span",
        _ => "div",
    }
}
