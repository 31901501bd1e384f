//! Token interface of the external p0 scanner
//!
//! The compiler core never looks inside the scanner. Tokens only travel as
//! far as parse diagnostics, which quote the offending token and the set of
//! token kinds that would have been accepted.

use crate::source_loc::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    Bool, Const, Else, False, Float, Fun, If, Int, Let, Return, True, While,

    // Operators and punctuation
    Bang,              // !
    BangEqual,         // !=
    AmpersandAmpersand, // &&
    LeftParen,         // (
    RightParen,        // )
    Star,              // *
    Plus,              // +
    Comma,             // ,
    Minus,             // -
    Slash,             // /
    Colon,             // :
    Semicolon,         // ;
    Less,              // <
    LessEqual,         // <=
    Equal,             // =
    EqualEqual,        // ==
    Greater,           // >
    GreaterEqual,      // >=
    Question,          // ?
    LeftBrace,         // {
    PipePipe,          // ||
    RightBrace,        // }

    // Variable lexemes
    Identifier,
    LiteralFloat,
    LiteralInt,
    LiteralString,

    EndOfStream,
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Bool => "Bool",
            TokenKind::Const => "const",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::Float => "Float",
            TokenKind::Fun => "fun",
            TokenKind::If => "if",
            TokenKind::Int => "Int",
            TokenKind::Let => "let",
            TokenKind::Return => "return",
            TokenKind::True => "true",
            TokenKind::While => "while",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Star => "*",
            TokenKind::Plus => "+",
            TokenKind::Comma => ",",
            TokenKind::Minus => "-",
            TokenKind::Slash => "/",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Question => "?",
            TokenKind::LeftBrace => "{",
            TokenKind::PipePipe => "||",
            TokenKind::RightBrace => "}",
            TokenKind::Identifier => "identifier",
            TokenKind::LiteralFloat => "float literal",
            TokenKind::LiteralInt => "int literal",
            TokenKind::LiteralString => "string literal",
            TokenKind::EndOfStream => "end of input",
            TokenKind::Error => "invalid token",
        };
        write!(f, "{text}")
    }
}

/// A token as delivered by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(default)]
    pub span: SourceSpan,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: SourceSpan, lexeme: impl Into<String>) -> Self {
        Self { kind, span, lexeme: lexeme.into() }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfStream => write!(f, "{}", self.kind),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
