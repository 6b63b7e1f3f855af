//! Expand and wrap flows against an in-memory host

use zen::zen::{
    BufferHost, ContextKind, Engine, ExpandError, Expansion, ParseError, TextPlacement,
};

fn link_host(text: &str) -> BufferHost {
    let mut host = BufferHost::with_text(ContextKind::Html, text);
    host.add_snippet("a", "<a href=\"$HREF$\">$END$</a>");
    host.add_snippet("btn", "<button$ATTRS$ type=\"button\">$END$</button>");
    host
}

#[test]
fn test_expand_inside_a_document() {
    let mut host = BufferHost::with_text(ContextKind::Html, "<body>ul>li*2</body>");
    host.select(13..13);
    let expansion = Engine::new().expand("ul>li*2", &mut host).unwrap();

    assert!(matches!(expansion, Expansion::Inserted(_)));
    assert_eq!(
        host.text(),
        "<body><ul>\n\t<li></li>\n\t<li></li>\n</ul></body>"
    );
    assert_eq!(host.caret(), "<body><ul>\n\t<li></li>\n\t<li>".len());
}

#[test]
fn test_snippet_gets_shorthand_attributes() {
    let engine = Engine::new();

    let mut host = link_host("a.nav");
    engine.expand("a.nav", &mut host).unwrap();
    assert_eq!(host.text(), "<a class=\"nav\" href=\"\"></a>");

    let mut host = link_host("a[href=/x]");
    engine.expand("a[href=/x]", &mut host).unwrap();
    assert_eq!(host.text(), "<a href=\"/x\"></a>");

    let mut host = link_host("btn#go");
    engine.expand("btn#go", &mut host).unwrap();
    assert_eq!(host.text(), "<button id=\"go\" type=\"button\"></button>");
}

#[test]
fn test_snippet_placeholders_survive() {
    let mut host = link_host("a");
    let expansion = Engine::new().expand("a", &mut host).unwrap();
    match expansion {
        Expansion::Inserted(template) => {
            assert_eq!(template.to_string(), "<a href=\"$HREF$\">$END$</a>")
        }
        Expansion::Deferred => panic!("single snippet should expand"),
    }
}

#[test]
fn test_shorthand_on_ambiguous_key_is_expanded_here() {
    let mut host = link_host("a.nav");
    host.add_snippet("a", "<abbr>$END$</abbr>");
    let expansion = Engine::new().expand("a.nav", &mut host).unwrap();
    assert!(matches!(expansion, Expansion::Inserted(_)));
    assert!(host.host_expansions().is_empty());
}

#[test]
fn test_alias_expands() {
    let mut host = BufferHost::with_text(ContextKind::Html, "ul+");
    host.add_alias("ul+", "ul>li");
    Engine::new().expand("ul+", &mut host).unwrap();
    assert_eq!(host.text(), "<ul>\n\t<li></li>\n</ul>");
}

#[test]
fn test_check_template_key() {
    let engine = Engine::new();
    let html = BufferHost::new(ContextKind::Html);
    assert!(engine.check_template_key("ul>li", &html));
    assert!(!engine.check_template_key("ul>", &html));

    let haml = BufferHost::new(ContextKind::Haml);
    assert!(!engine.check_template_key("p", &haml));
    assert!(!engine.is_applicable(&haml, true));
    assert!(engine.is_applicable(&haml, false));
}

#[test]
fn test_wrap_selection_in_place() {
    let mut host = BufferHost::with_text(ContextKind::Html, "x hello y");
    host.select(2..7);
    let template = Engine::new().wrap("b", &mut host).unwrap();

    assert_eq!(template.text(), "<b>hello</b>");
    assert_eq!(host.text(), "x <b>hello</b> y");
    assert_eq!(host.caret(), 10);
    assert!(!host.in_edit());
}

#[test]
fn test_wrap_per_leaf_placement() {
    let engine = Engine::new().with_placement(TextPlacement::PerLeaf);
    let mut host = BufferHost::with_text(ContextKind::Html, "a\nb");
    host.select(0..3);
    let template = engine.wrap("p+p", &mut host).unwrap();
    assert_eq!(template.text(), "<p>a</p>\n<p>b</p>");
}

#[test]
fn test_wrap_in_haml_uses_no_generator() {
    let mut host = BufferHost::with_text(ContextKind::Haml, "text");
    host.select(0..4);
    assert_eq!(
        Engine::new().wrap("p", &mut host),
        Err(ExpandError::NotApplicable(ContextKind::Haml))
    );
    assert_eq!(host.text(), "text");
}

#[test]
fn test_unknown_filter_is_an_invalid_abbreviation() {
    let mut host = BufferHost::with_text(ContextKind::Html, "p|zz");
    let error = Engine::new().expand("p|zz", &mut host).unwrap_err();
    assert_eq!(
        error,
        ExpandError::Invalid(ParseError::UnknownFilter("zz".to_string()))
    );
    assert!(error.is_invalid_abbreviation());
    assert_eq!(host.text(), "p|zz");
    assert!(host.last_template().is_none());
}

#[test]
fn test_generator_suffix_checked_for_the_mode() {
    let engine = Engine::new();
    let html = BufferHost::new(ContextKind::Html);
    assert!(!engine.check_template_key("p|haml", &html));
    assert!(engine.check_template_key("p|html", &html));

    let mut host = BufferHost::with_text(ContextKind::Html, "text");
    host.select(0..4);
    let error = engine.wrap("p|haml", &mut host).unwrap_err();
    assert_eq!(
        error,
        ExpandError::Invalid(ParseError::UnknownFilter("haml".to_string()))
    );
    assert!(error.is_invalid_abbreviation());
    assert_eq!(host.text(), "text");
}

#[test]
fn test_markup_suffix_in_haml_is_unknown() {
    let error = Engine::new()
        .expand_to_template("p|html", None, ContextKind::Haml, &BufferHost::new(ContextKind::Haml))
        .unwrap_err();
    assert_eq!(
        error,
        ExpandError::Invalid(ParseError::UnknownFilter("html".to_string()))
    );
    assert!(error.is_invalid_abbreviation());
}
