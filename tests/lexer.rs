//! Lexer behavior over representative abbreviations

use rstest::rstest;
use zen::zen::{lex, LexError, Token};

fn ident(s: &str) -> Token {
    Token::Identifier(s.to_string())
}

#[rstest]
#[case("ul>li", vec![ident("ul"), Token::Operator('>'), ident("li")])]
#[case("p+p", vec![ident("p"), Token::Operator('+'), ident("p")])]
#[case("td*2", vec![ident("td"), Token::Operator('*'), Token::Number(2)])]
#[case("li*", vec![ident("li"), Token::Operator('*')])]
#[case("a^b", vec![ident("a"), Token::Operator('^'), ident("b")])]
#[case("div|e", vec![ident("div"), Token::Pipe, ident("e")])]
fn test_operators(#[case] input: &str, #[case] expected: Vec<Token>) {
    assert_eq!(lex(input).unwrap(), expected);
}

#[rstest]
#[case("ul+", vec![ident("ul+")])]
#[case("(table+)", vec![Token::OpenParen, ident("table+"), Token::CloseParen])]
#[case("ul+p", vec![ident("ul"), Token::Operator('+'), ident("p")])]
fn test_trailing_plus(#[case] input: &str, #[case] expected: Vec<Token>) {
    assert_eq!(lex(input).unwrap(), expected);
}

#[rstest]
#[case("p{a>b}", "a>b")]
#[case("p{{x}}", "{x}")]
#[case("p{}", "")]
fn test_text_spans(#[case] input: &str, #[case] text: &str) {
    assert_eq!(
        lex(input).unwrap(),
        vec![ident("p"), Token::Text(text.to_string())]
    );
}

#[test]
fn test_quoted_values_keep_delimiters() {
    assert_eq!(
        lex("a[title='x > y']").unwrap(),
        vec![
            ident("a"),
            Token::OpenBracket,
            ident("title"),
            Token::Equals,
            Token::String("x > y".to_string()),
            Token::CloseBracket,
        ]
    );
}

#[test]
fn test_numbering_markers_stay_in_identifiers() {
    assert_eq!(
        lex("li.item$$@-3").unwrap(),
        vec![ident("li"), Token::Dot, ident("item$$@-3")]
    );
}

#[rstest]
#[case("a[title=\"x]", LexError::UnterminatedString { quote: '"', offset: 8 })]
#[case("a[title='x]", LexError::UnterminatedString { quote: '\'', offset: 8 })]
#[case("p{{x}", LexError::UnterminatedText { depth: 1, offset: 1 })]
fn test_unterminated_input_fails(#[case] input: &str, #[case] expected: LexError) {
    assert_eq!(lex(input), Err(expected));
}
