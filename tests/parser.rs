//! Parser behavior that depends on the host: aliases, snippets, generators and filters

use zen::zen::ast::{Group, Operator};
use zen::zen::generators::{HamlGenerator, MarkupGenerator};
use zen::zen::{parse_abbreviation, BufferHost, ContextKind, Node, ParseContext, ParseError, Registry};

fn group(node: &Node) -> &Group {
    match node {
        Node::Group(group) => group,
        other => panic!("Expected group, got {other:?}"),
    }
}

#[test]
fn test_alias_expands_to_bracketed_abbreviation() {
    let mut host = BufferHost::new(ContextKind::Html);
    host.add_alias("ul+", "ul>li");
    let context = ParseContext::new(&host, ContextKind::Html);

    let tree = parse_abbreviation("ul+", &context).unwrap();
    let bracket = group(&tree);
    assert_eq!(bracket.operator, Operator::Bracket);
    assert_eq!(group(&bracket.children[0]).operator, Operator::Child);
}

#[test]
fn test_alias_inside_larger_abbreviation() {
    let mut host = BufferHost::new(ContextKind::Html);
    host.add_alias("ol+", "ol>li");
    let context = ParseContext::new(&host, ContextKind::Html);

    let tree = parse_abbreviation("div>(ol+)*2", &context).unwrap();
    let child = group(&tree);
    assert_eq!(child.operator, Operator::Child);
    assert!(child.children[1].multiplier().is_some());
}

#[test]
fn test_recursive_alias_is_rejected() {
    let mut host = BufferHost::new(ContextKind::Html);
    host.add_alias("a+", "b+");
    host.add_alias("b+", "a+");
    let context = ParseContext::new(&host, ContextKind::Html);

    assert_eq!(
        parse_abbreviation("a+", &context),
        Err(ParseError::RecursiveAlias("a+".to_string()))
    );
}

#[test]
fn test_snippet_keys_skip_the_key_check() {
    let mut host = BufferHost::new(ContextKind::Html);
    let context = ParseContext::new(&host, ContextKind::Html);
    assert_eq!(
        parse_abbreviation("!", &context),
        Err(ParseError::InvalidKey("!".to_string()))
    );

    host.add_snippet("!", "<!DOCTYPE html>$END$");
    let context = ParseContext::new(&host, ContextKind::Html);
    match parse_abbreviation("!", &context).unwrap() {
        Node::Template(template) => assert!(template.snippet.is_some()),
        other => panic!("Expected template, got {other:?}"),
    }
}

#[test]
fn test_snippet_attribute_merge_depends_on_generator() {
    let mut host = BufferHost::new(ContextKind::Html);
    host.add_snippet("a", "<a href=\"$HREF$\">$END$</a>");
    host.add_snippet("hi", "hello $END$");

    let markup = MarkupGenerator::default();
    let context = ParseContext::new(&host, ContextKind::Html).with_generator(&markup);
    assert!(parse_abbreviation("a.nav", &context).is_ok());
    assert_eq!(
        parse_abbreviation("hi.x", &context),
        Err(ParseError::SnippetRejectsAttributes("hi".to_string()))
    );

    let haml = HamlGenerator::default();
    let context = ParseContext::new(&host, ContextKind::Haml).with_generator(&haml);
    assert!(parse_abbreviation("a", &context).is_ok());
    assert_eq!(
        parse_abbreviation("a.nav", &context),
        Err(ParseError::SnippetRejectsAttributes("a".to_string()))
    );
}

#[test]
fn test_text_needs_a_generator_that_supports_it() {
    let host = BufferHost::new(ContextKind::Haml);
    let haml = HamlGenerator::default();
    let context = ParseContext::new(&host, ContextKind::Haml).with_generator(&haml);

    assert_eq!(
        parse_abbreviation("p{hi}", &context),
        Err(ParseError::TextNotSupported {
            generator: "haml".to_string()
        })
    );
}

#[test]
fn test_text_after_template_becomes_its_child() {
    let host = BufferHost::new(ContextKind::Html);
    let context = ParseContext::new(&host, ContextKind::Html);

    let tree = parse_abbreviation("p{hi}", &context).unwrap();
    let child = group(&tree);
    assert_eq!(child.operator, Operator::Child);
    assert_eq!(child.children[1], Node::text("hi"));
}

#[test]
fn test_filter_suffixes_checked_against_registry() {
    let host = BufferHost::new(ContextKind::Html);
    let registry = Registry::with_defaults();

    let html = ParseContext::new(&host, ContextKind::Html).with_registry(&registry);
    assert!(parse_abbreviation("p|e|c", &html).is_ok());
    assert!(parse_abbreviation("p|haml", &html).is_ok());
    assert_eq!(
        parse_abbreviation("p|zz", &html),
        Err(ParseError::UnknownFilter("zz".to_string()))
    );
    assert_eq!(
        parse_abbreviation("p|xsl", &html),
        Err(ParseError::UnknownFilter("xsl".to_string()))
    );

    let xsl = ParseContext::new(&host, ContextKind::Xsl).with_registry(&registry);
    assert!(parse_abbreviation("p|xsl", &xsl).is_ok());
}

#[test]
fn test_dangling_operators_fail() {
    let host = BufferHost::new(ContextKind::Html);
    let context = ParseContext::new(&host, ContextKind::Html);

    for input in ["ul>", "a+", "p|", "a[title"] {
        assert!(
            parse_abbreviation(input, &context).is_err(),
            "'{input}' should not parse"
        );
    }
}
