//! Lexer
//!
//! Converts an abbreviation into a flat token sequence.
//!
//! Modes
//!
//!     The scan runs over the abbreviation followed by the [TERMINATOR] sentinel, so reaching
//!     the end of input always flushes whatever identifier is pending. Four mutually exclusive
//!     modes are checked in order:
//!
//!     1. Double-quoted string: everything up to the closing `"` is taken verbatim.
//!     2. Single-quoted string: same, closed by `'`.
//!     3. Raw text: a `{ ... }` span, nested braces tracked by depth. The token is emitted
//!        only when the depth returns to zero.
//!     4. Default: non-delimiters accumulate; a delimiter flushes the buffer as a number or an
//!        identifier and then produces its own token (or opens one of the modes above).
//!
//!     A `+` that is the last character, or that is directly followed by `)`, belongs to the
//!     identifier instead of being an operator. This keeps keys such as `ul+` intact.
//!
//! Failure
//!
//!     An unclosed quote or a brace span still open at the end fails the whole lex. No partial
//!     token stream is ever returned.

use crate::zen::token::{is_delimiter, Token, TERMINATOR};

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A quoted string opened at `offset` was never closed
    #[error("unterminated {quote}-quoted string starting at offset {offset}")]
    UnterminatedString { quote: char, offset: usize },
    /// A brace span opened at `offset` still had `depth` open braces at the end
    #[error("unterminated text span starting at offset {offset} ({depth} unclosed)")]
    UnterminatedText { depth: usize, offset: usize },
}

enum Mode {
    Default,
    Quoted { quote: char, start: usize },
    Text { depth: usize, start: usize },
}

/// Lex an abbreviation into tokens.
pub fn lex(text: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = text.chars().chain(std::iter::once(TERMINATOR)).collect();
    let last = chars.len() - 1;

    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut mode = Mode::Default;

    for (i, &c) in chars.iter().enumerate() {
        match &mut mode {
            Mode::Quoted { quote, .. } => {
                if c == *quote && i != last {
                    tokens.push(Token::String(std::mem::take(&mut buffer)));
                    mode = Mode::Default;
                } else if i != last {
                    buffer.push(c);
                }
                continue;
            }
            Mode::Text { depth, .. } => {
                if i == last {
                    continue;
                }
                match c {
                    '}' => {
                        *depth -= 1;
                        if *depth == 0 {
                            tokens.push(Token::Text(std::mem::take(&mut buffer)));
                            mode = Mode::Default;
                            continue;
                        }
                    }
                    '{' => *depth += 1,
                    _ => {}
                }
                buffer.push(c);
                continue;
            }
            Mode::Default => {}
        }

        if !is_delimiter(c) {
            buffer.push(c);
            continue;
        }

        // `ul+` and `(ul+)`: the plus is part of the key
        if c == '+' && (i + 1 == last || chars[i + 1] == ')') {
            buffer.push(c);
            continue;
        }

        flush(&mut buffer, &mut tokens);

        match c {
            '"' | '\'' => mode = Mode::Quoted { quote: c, start: i },
            '{' => mode = Mode::Text { depth: 1, start: i },
            _ => tokens.extend(Token::from_delimiter(c)),
        }
    }

    match mode {
        Mode::Default => {
            tracing::trace!(count = tokens.len(), "lexed abbreviation");
            Ok(tokens)
        }
        Mode::Quoted { quote, start } => Err(LexError::UnterminatedString {
            quote,
            offset: start,
        }),
        Mode::Text { depth, start } => Err(LexError::UnterminatedText {
            depth,
            offset: start,
        }),
    }
}

fn flush(buffer: &mut String, tokens: &mut Vec<Token>) {
    if buffer.is_empty() {
        return;
    }
    let text = std::mem::take(buffer);
    tokens.push(match parse_non_negative(&text) {
        Some(n) => Token::Number(n),
        None => Token::Identifier(text),
    });
}

fn parse_non_negative(text: &str) -> Option<u32> {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}
