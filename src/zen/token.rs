//! Token types and the grammar table shared by the lexer and the parser.
//!
//!     The abbreviation grammar is small enough that a single flat token enum covers it. Tokens
//!     carry no source positions and no tree linkage: the parser only ever needs the kind and
//!     the payload.
//!
//! Delimiters
//!
//!     Every character in [DELIMITERS] ends the pending identifier. Quotes and `{` switch the
//!     lexer into a string or raw text mode, the sentinel terminator produces nothing, and
//!     every other delimiter becomes its own single token.

use serde::Serialize;
use std::fmt;

/// Sentinel appended by the lexer so end of input always flushes the pending buffer.
pub const TERMINATOR: char = '\0';

/// Characters that end an identifier.
pub const DELIMITERS: &str = ">+*|()[]{}.#,='\" \0^";

/// Binary operator for parent/child nesting.
pub const CHILD: char = '>';
/// Binary operator for sibling composition.
pub const SIBLING: char = '+';
/// Binary operator that closes the current nesting level.
pub const CLIMB_UP: char = '^';
/// Multiplication operator.
pub const MULTIPLY: char = '*';

/// Returns true when `c` ends an identifier.
pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(c)
}

/// A single abbreviation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Token {
    /// Element keys, class names, attribute names and unquoted values.
    Identifier(String),
    /// A non-negative integer literal.
    Number(u32),
    /// A quoted literal; holds the content without the quotes.
    String(String),
    /// A brace-delimited span; holds the content without the outer braces.
    Text(String),
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Equals,
    Dot,
    Sharp,
    Comma,
    Space,
    Pipe,
    /// `+`, `>`, `*`, `^`, or a stray `}`.
    Operator(char),
}

impl Token {
    /// Maps a delimiter character to its symbolic token.
    ///
    /// Returns `None` for characters that do not produce a token on their own: the
    /// terminator and the characters that open a lexer mode.
    pub fn from_delimiter(c: char) -> Option<Token> {
        let token = match c {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '=' => Token::Equals,
            '.' => Token::Dot,
            '#' => Token::Sharp,
            ',' => Token::Comma,
            ' ' => Token::Space,
            '|' => Token::Pipe,
            TERMINATOR | '"' | '\'' | '{' => return None,
            other => Token::Operator(other),
        };
        Some(token)
    }

    /// Check if this token is the given operator
    pub fn is_operator(&self, sign: char) -> bool {
        matches!(self, Token::Operator(c) if *c == sign)
    }

    /// Text usable as a name: identifiers and numbers.
    pub fn as_name(&self) -> Option<String> {
        match self {
            Token::Identifier(text) => Some(text.clone()),
            Token::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "<identifier:{s}>"),
            Token::Number(n) => write!(f, "<number:{n}>"),
            Token::String(s) => write!(f, "<string:{s}>"),
            Token::Text(s) => write!(f, "<text:{s}>"),
            Token::OpenParen => write!(f, "<open-paren>"),
            Token::CloseParen => write!(f, "<close-paren>"),
            Token::OpenBracket => write!(f, "<open-bracket>"),
            Token::CloseBracket => write!(f, "<close-bracket>"),
            Token::Equals => write!(f, "<equals>"),
            Token::Dot => write!(f, "<dot>"),
            Token::Sharp => write!(f, "<sharp>"),
            Token::Comma => write!(f, "<comma>"),
            Token::Space => write!(f, "<space>"),
            Token::Pipe => write!(f, "<pipe>"),
            Token::Operator(c) => write!(f, "<operator:{c}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_are_delimiters() {
        for c in [CHILD, SIBLING, CLIMB_UP, MULTIPLY] {
            assert!(is_delimiter(c));
            assert_eq!(Token::from_delimiter(c), Some(Token::Operator(c)));
        }
    }

    #[test]
    fn test_mode_openers_produce_no_token() {
        for c in ['"', '\'', '{', TERMINATOR] {
            assert!(is_delimiter(c));
            assert_eq!(Token::from_delimiter(c), None);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Identifier("ul".into()).to_string(), "<identifier:ul>");
        assert_eq!(Token::Operator('>').to_string(), "<operator:>>");
        assert_eq!(Token::Number(3).to_string(), "<number:3>");
    }

    #[test]
    fn test_as_name() {
        assert_eq!(Token::Number(7).as_name(), Some("7".to_string()));
        assert_eq!(Token::Dot.as_name(), None);
    }
}
