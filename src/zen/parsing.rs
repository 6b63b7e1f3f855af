//! Parser
//!
//! Recursive descent over the token stream, producing an abbreviation [Node] tree.
//!
//! Grammar
//!
//!     From the lowest precedence up:
//!
//!         abbreviation := expr ( '|' NAME )*
//!         expr         := mul? '^' expr | mul '+' expr | mul '>' expr | mul
//!         mul          := primary ( '*' NUMBER? )?
//!         primary      := '(' expr ')' | TEXT | template TEXT?
//!         template     := ( NAME | implicit ) selector*
//!         selector     := '.' NAME | '#' NAME | '[' attribute* ']'
//!         attribute    := ( SPACE | COMMA )* NAME ( '=' ( STRING | NAME ) )?
//!
//!     Binary operators associate to the right, so `a>b+c` nests both `b` and `c` into `a`,
//!     and a `^` lifts everything after it. A bare `*` repeats once per wrapped line. A
//!     template followed by a text span gets the text as its first child.
//!
//! Context
//!
//!     [ParseContext] injects what the grammar alone cannot decide: host snippets and aliases
//!     for keys, the default generator (text spans are rejected when it has no text leaves, and
//!     it decides whether attributes can be merged into a snippet) and the registry the filter
//!     suffixes are checked against. A generator suffix only counts when that generator applies
//!     in the context and mode (plain expansion or wrapping) being parsed for.
//!
//! Aliases
//!
//!     A key ending in `+` (`ul+`) names an alias. Its abbreviation is lexed and parsed in
//!     place and spliced in as a bracket group. An alias that reaches itself again fails.
//!
//! Failure
//!
//!     Any failure rejects the whole abbreviation: leftover tokens, a tree that is only text,
//!     an unknown key or suffix. Callers treat a failed parse as "not an abbreviation".

use crate::zen::ast::{Multiplier, Node, Operator, Template, ID};
use crate::zen::context::ContextKind;
use crate::zen::generators::Generator;
use crate::zen::host::TemplateLookup;
use crate::zen::lexing::{lex, LexError};
use crate::zen::registry::Registry;
use crate::zen::token::{Token, CHILD, CLIMB_UP, MULTIPLY, SIBLING};
use once_cell::sync::Lazy;
use regex::Regex;

static ELEMENT_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}_$][\p{L}\p{N}_:\-$@]*$").expect("element key pattern")
});

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("empty abbreviation")]
    Empty,
    #[error("unexpected {found} at token {index}")]
    Unexpected { found: String, index: usize },
    #[error("abbreviation ends early")]
    UnexpectedEnd,
    #[error("expected {expected} at token {index}")]
    Expected {
        expected: &'static str,
        index: usize,
    },
    #[error("{count} token(s) left over, starting with {first}")]
    LeftoverTokens { first: String, count: usize },
    #[error("a bare text span is not an abbreviation")]
    TextRoot,
    #[error("the {generator} generator has no text leaves")]
    TextNotSupported { generator: String },
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
    #[error("'{0}' is neither a template nor an element name")]
    InvalidKey(String),
    #[error("attributes cannot be merged into the '{0}' template")]
    SnippetRejectsAttributes(String),
    #[error("alias '{0}' expands to itself")]
    RecursiveAlias(String),
}

/// What parsing needs from outside the abbreviation
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub lookup: &'a dyn TemplateLookup,
    pub context: ContextKind,
    pub generator: Option<&'a dyn Generator>,
    pub registry: Option<&'a Registry>,
    /// The abbreviation will wrap a selection
    pub wrapping: bool,
}

impl<'a> ParseContext<'a> {
    pub fn new(lookup: &'a dyn TemplateLookup, context: ContextKind) -> Self {
        Self {
            lookup,
            context,
            generator: None,
            registry: None,
            wrapping: false,
        }
    }

    pub fn with_generator(mut self, generator: &'a dyn Generator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Check filter suffixes against `registry`
    pub fn with_registry(mut self, registry: &'a Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Check generator suffixes for wrapping instead of plain expansion
    pub fn wrapping(mut self, wrapping: bool) -> Self {
        self.wrapping = wrapping;
        self
    }
}

/// Lex and parse an abbreviation
pub fn parse_abbreviation(text: &str, context: &ParseContext) -> Result<Node, ParseError> {
    let tokens = lex(text)?;
    parse(&tokens, context)
}

/// Parse a token stream into an abbreviation tree
pub fn parse(tokens: &[Token], context: &ParseContext) -> Result<Node, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    validate(tokens, context)?;

    let mut parser = Parser::new(tokens, context, Vec::new());
    let node = parser.abbreviation()?;
    parser.finish()?;
    if reduces_to_text(&node) {
        return Err(ParseError::TextRoot);
    }

    tracing::debug!(tokens = tokens.len(), "parsed abbreviation");
    Ok(node)
}

fn validate(tokens: &[Token], context: &ParseContext) -> Result<(), ParseError> {
    match context.generator {
        Some(generator)
            if !generator.supports_text() && tokens.iter().any(|t| matches!(t, Token::Text(_))) =>
        {
            Err(ParseError::TextNotSupported {
                generator: generator.name().to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Whether the tree is a single text span once filters, brackets, multipliers and leading
/// climb-ups are looked through
fn reduces_to_text(node: &Node) -> bool {
    match node.unfiltered() {
        Node::Text { .. } => true,
        Node::Group(group) => match (group.operator, group.children.as_slice()) {
            (Operator::Bracket, [inner]) => reduces_to_text(inner),
            (Operator::ClimbUp, [Node::Empty, right]) => reduces_to_text(right),
            _ => false,
        },
        _ => false,
    }
}

struct Parser<'t, 'c> {
    tokens: &'t [Token],
    index: usize,
    context: &'c ParseContext<'c>,
    /// Aliases being expanded, outermost first
    aliases: Vec<String>,
}

impl<'t, 'c> Parser<'t, 'c> {
    fn new(tokens: &'t [Token], context: &'c ParseContext<'c>, aliases: Vec<String>) -> Self {
        Self {
            tokens,
            index: 0,
            context,
            aliases,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    fn peek_operator(&self, sign: char) -> bool {
        self.peek().is_some_and(|t| t.is_operator(sign))
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.index);
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Option<String> {
        let name = self.peek()?.as_name()?;
        self.index += 1;
        Some(name)
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::Unexpected {
                found: token.to_string(),
                index: self.index,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(_) => ParseError::Expected {
                expected,
                index: self.index,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(first) => Err(ParseError::LeftoverTokens {
                first: first.to_string(),
                count: self.tokens.len() - self.index,
            }),
            None => Ok(()),
        }
    }

    fn abbreviation(&mut self) -> Result<Node, ParseError> {
        let mut node = self.expr()?;
        while self.eat(&Token::Pipe) {
            let suffix = self.name().ok_or_else(|| self.expected("filter name"))?;
            if let Some(registry) = self.context.registry {
                let context = self.context;
                if !registry.accepts_suffix(&suffix, context.context, context.wrapping) {
                    return Err(ParseError::UnknownFilter(suffix));
                }
            }
            node = Node::filtered(node, suffix);
        }
        Ok(node)
    }

    fn expr(&mut self) -> Result<Node, ParseError> {
        if self.peek_operator(CLIMB_UP) {
            self.index += 1;
            let right = self.expr()?;
            return Ok(Node::binary(Operator::ClimbUp, Node::Empty, right));
        }

        let left = self.mul()?;
        let operator = match self.peek() {
            Some(Token::Operator(SIBLING)) => Operator::Sibling,
            Some(Token::Operator(CHILD)) => Operator::Child,
            Some(Token::Operator(CLIMB_UP)) => Operator::ClimbUp,
            _ => return Ok(left),
        };
        self.index += 1;
        let right = self.expr()?;
        Ok(Node::binary(operator, left, right))
    }

    fn mul(&mut self) -> Result<Node, ParseError> {
        let node = self.primary()?;
        if !self.peek_operator(MULTIPLY) {
            return Ok(node);
        }
        self.index += 1;
        let multiplier = match self.peek() {
            Some(Token::Number(count)) => {
                self.index += 1;
                Multiplier::Count(*count)
            }
            _ => Multiplier::PerLine,
        };
        Ok(node.multiplied(multiplier))
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(Token::OpenParen) => {
                self.index += 1;
                let inner = self.expr()?;
                if !self.eat(&Token::CloseParen) {
                    return Err(self.expected("')'"));
                }
                Ok(Node::bracket(inner))
            }
            Some(Token::Text(text)) => {
                self.index += 1;
                Ok(Node::text(text.as_str()))
            }
            Some(
                Token::Identifier(_)
                | Token::Number(_)
                | Token::Dot
                | Token::Sharp
                | Token::OpenBracket,
            ) => {
                let template = self.template()?;
                match self.peek() {
                    Some(Token::Text(text)) => {
                        self.index += 1;
                        Ok(Node::binary(Operator::Child, template, Node::text(text.as_str())))
                    }
                    _ => Ok(template),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn template(&mut self) -> Result<Node, ParseError> {
        let key = self.name();
        if let Some(alias) = key.as_deref().filter(|k| k.ends_with('+')) {
            if let Some(abbreviation) = self.context.lookup.find_alias(alias) {
                return self.alias(alias, &abbreviation);
            }
        }

        let mut template = Template::new(key);
        if let Some(key) = &template.key {
            template.snippet = self.context.lookup.find_template(key);
            if template.snippet.is_none() && !ELEMENT_KEY.is_match(key) {
                return Err(ParseError::InvalidKey(key.clone()));
            }
        }

        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.index += 1;
                    let class = self.name().ok_or_else(|| self.expected("class name"))?;
                    template.add_class(&class);
                }
                Some(Token::Sharp) => {
                    self.index += 1;
                    let id = self.name().ok_or_else(|| self.expected("id"))?;
                    template.set_attribute(ID, &id);
                }
                Some(Token::OpenBracket) => {
                    self.index += 1;
                    self.attributes(&mut template)?;
                }
                _ => break,
            }
        }

        if let (Some(snippet), Some(generator)) = (&template.snippet, self.context.generator) {
            if !generator.accepts_snippet(snippet, !template.attributes.is_empty()) {
                let key = template.key.clone().unwrap_or_default();
                return Err(ParseError::SnippetRejectsAttributes(key));
            }
        }
        Ok(Node::Template(template))
    }

    fn attributes(&mut self, template: &mut Template) -> Result<(), ParseError> {
        loop {
            match self.advance() {
                Some(Token::CloseBracket) => return Ok(()),
                Some(Token::Space | Token::Comma) => {}
                Some(token @ (Token::Identifier(_) | Token::Number(_))) => {
                    let name = token.as_name().unwrap_or_default();
                    let value = if self.eat(&Token::Equals) {
                        self.attribute_value()
                    } else {
                        String::new()
                    };
                    template.set_attribute(&name, &value);
                }
                Some(_) => {
                    self.index -= 1;
                    return Err(self.unexpected());
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    fn attribute_value(&mut self) -> String {
        match self.peek() {
            Some(Token::String(value)) => {
                self.index += 1;
                value.clone()
            }
            Some(token @ (Token::Identifier(_) | Token::Number(_))) => {
                self.index += 1;
                token.as_name().unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    fn alias(&mut self, key: &str, abbreviation: &str) -> Result<Node, ParseError> {
        if self.aliases.iter().any(|active| active == key) {
            return Err(ParseError::RecursiveAlias(key.to_string()));
        }
        let tokens = lex(abbreviation)?;
        validate(&tokens, self.context)?;

        let mut aliases = self.aliases.clone();
        aliases.push(key.to_string());
        let mut nested = Parser::new(&tokens, self.context, aliases);
        let node = nested.expr()?;
        nested.finish()?;
        tracing::trace!(alias = key, abbreviation, "expanded alias");
        Ok(Node::bracket(node))
    }
}
