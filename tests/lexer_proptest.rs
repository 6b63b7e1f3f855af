//! Property-based tests for the abbreviation lexer
//!
//! These tests generate abbreviations from the grammar's building blocks and check that the
//! lexer never panics, that quoted and braced spans come back verbatim, and that lexing the
//! printed pieces of an abbreviation is stable.

use proptest::prelude::*;
use zen::zen::{lex, Token};

/// Generate element keys
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9]{0,6}",
        "[a-z]{1,4}:[a-z]{1,6}",
        "[a-z]{1,4}-[a-z]{1,4}",
    ]
}

/// Generate a template with optional shorthands
fn template_strategy() -> impl Strategy<Value = String> {
    (
        key_strategy(),
        prop::option::of("[a-z]{1,6}"),
        prop::option::of("[a-z]{1,6}"),
        prop::option::of(1u32..20),
    )
        .prop_map(|(key, class, id, count)| {
            let mut out = key;
            if let Some(class) = class {
                out.push('.');
                out.push_str(&class);
            }
            if let Some(id) = id {
                out.push('#');
                out.push_str(&id);
            }
            if let Some(count) = count {
                out.push_str(&format!("*{count}"));
            }
            out
        })
}

/// Generate abbreviations joined by operators
fn abbreviation_strategy() -> impl Strategy<Value = String> {
    (
        template_strategy(),
        prop::collection::vec((prop_oneof![Just(">"), Just("+"), Just("^")], template_strategy()), 0..5),
    )
        .prop_map(|(first, rest)| {
            rest.into_iter().fold(first, |mut acc, (op, template)| {
                acc.push_str(op);
                acc.push_str(&template);
                acc
            })
        })
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_lex_never_panics(input in "\\PC{0,40}") {
            let _ = lex(&input);
        }

        #[test]
        fn test_generated_abbreviations_lex(input in abbreviation_strategy()) {
            let tokens = lex(&input);
            prop_assert!(tokens.is_ok(), "Failed to lex: {}", input);
        }

        #[test]
        fn test_operator_count_matches(input in abbreviation_strategy()) {
            let tokens = lex(&input).unwrap();
            let expected = input.chars().filter(|c| ">+^*".contains(*c)).count();
            let operators = tokens
                .iter()
                .filter(|t| matches!(t, Token::Operator(_)))
                .count();
            prop_assert_eq!(operators, expected);
        }

        #[test]
        fn test_quoted_value_is_verbatim(value in "[a-z >+*^()|.#]{0,12}") {
            let tokens = lex(&format!("a[title=\"{value}\"]")).unwrap();
            prop_assert_eq!(&tokens[4], &Token::String(value));
        }

        #[test]
        fn test_text_span_is_verbatim(text in "[a-z >+*^()|.#\\[\\]]{0,12}") {
            let tokens = lex(&format!("p{{{text}}}")).unwrap();
            prop_assert_eq!(tokens, vec![Token::Identifier("p".to_string()), Token::Text(text)]);
        }
    }
}
