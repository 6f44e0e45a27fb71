//! Compiler for guard strings of the form `"<expression> / <tag>"`.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! guard   := expr ( '/' tag )?
//! expr    := conj ( ('or' | '|') conj )*
//! conj    := unary ( ('and' | '&') unary )*
//! unary   := ('not' | '!') unary | '(' expr ')' | 'true' | 'false' | SYMBOL
//! ```
//!
//! Keywords are case-sensitive lower case. Symbols are resolved through
//! [`Proposition::from_name`] while parsing, so an unknown symbol is a
//! construction error rather than a guard that silently never matches.

use super::formula::Formula;
use super::guard::{CounterTag, Guard};
use super::proposition::Proposition;
use thiserror::Error;

/// Errors raised while compiling a guard string.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuardParseError {
    #[error("Unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("Unexpected end of guard expression")]
    UnexpectedEnd,

    #[error("Unknown proposition '{0}'")]
    UnknownProposition(String),

    #[error("Counter tag after '/' is empty")]
    EmptyTag,
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Not,
    And,
    Or,
    True,
    False,
    LeftParen,
    RightParen,
    Symbol(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Not => "not".to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Symbol(s) => s.clone(),
        }
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, GuardParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | '!' | '&' | '|' => {
                chars.next();
                let token = match c {
                    '(' => Token::LeftParen,
                    ')' => Token::RightParen,
                    '!' => Token::Not,
                    '&' => Token::And,
                    _ => Token::Or,
                };
                tokens.push((token, offset));
            }
            c if is_symbol_char(c) => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_symbol_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                let token = match word.as_str() {
                    "not" => Token::Not,
                    "and" => Token::And,
                    "or" => Token::Or,
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Symbol(word),
                };
                tokens.push((token, offset));
            }
            other => {
                return Err(GuardParseError::UnexpectedChar {
                    found: other,
                    offset,
                })
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr<P: Proposition>(&mut self) -> Result<Formula<P>, GuardParseError> {
        let mut lhs = self.conj()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            lhs = lhs.or(self.conj()?);
        }
        Ok(lhs)
    }

    fn conj<P: Proposition>(&mut self) -> Result<Formula<P>, GuardParseError> {
        let mut lhs = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            lhs = lhs.and(self.unary()?);
        }
        Ok(lhs)
    }

    fn unary<P: Proposition>(&mut self) -> Result<Formula<P>, GuardParseError> {
        let (token, offset) = self.advance().ok_or(GuardParseError::UnexpectedEnd)?;
        match token {
            Token::Not => Ok(self.unary()?.not()),
            Token::True => Ok(Formula::True),
            Token::False => Ok(Formula::False),
            Token::Symbol(name) => P::from_name(&name)
                .map(Formula::Atom)
                .ok_or(GuardParseError::UnknownProposition(name)),
            Token::LeftParen => {
                let inner = self.expr()?;
                match self.advance() {
                    Some((Token::RightParen, _)) => Ok(inner),
                    Some((other, offset)) => Err(GuardParseError::UnexpectedToken {
                        found: other.describe(),
                        offset,
                    }),
                    None => Err(GuardParseError::UnexpectedEnd),
                }
            }
            other => Err(GuardParseError::UnexpectedToken {
                found: other.describe(),
                offset,
            }),
        }
    }
}

/// Compile a bare propositional expression.
pub fn parse_formula<P: Proposition>(input: &str) -> Result<Formula<P>, GuardParseError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
    };
    let formula = parser.expr()?;
    match parser.advance() {
        None => Ok(formula),
        Some((token, offset)) => Err(GuardParseError::UnexpectedToken {
            found: token.describe(),
            offset,
        }),
    }
}

/// Compile a full guard string; the `/ tag` suffix is optional.
pub fn parse_guard<P: Proposition>(input: &str) -> Result<Guard<P>, GuardParseError> {
    match input.rsplit_once('/') {
        Some((expr, tag)) => {
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(GuardParseError::EmptyTag);
            }
            Ok(Guard::new(parse_formula(expr)?).with_tag(CounterTag::new(tag)))
        }
        None => Ok(Guard::new(parse_formula(input)?)),
    }
}
