//! Expression nodes

use super::Identifier;
use p0_common::{BinaryOp, HasSpan, SourceSpan, UnaryOp};
use serde::Deserialize;

/// A literal with its source text; numbers are unparsed digits, strings keep their quotes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum LiteralValue {
    Bool {
        value: bool,
        #[serde(default)]
        span: SourceSpan,
    },
    Int {
        value: String,
        #[serde(default)]
        span: SourceSpan,
    },
    Float {
        value: String,
        #[serde(default)]
        span: SourceSpan,
    },
    String {
        value: String,
        #[serde(default)]
        span: SourceSpan,
    },
}

impl HasSpan for LiteralValue {
    fn span(&self) -> SourceSpan {
        match self {
            LiteralValue::Bool { span, .. }
            | LiteralValue::Int { span, .. }
            | LiteralValue::Float { span, .. }
            | LiteralValue::String { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum Expression {
    Ternary {
        expression1: Box<Expression>,
        expression2: Box<Expression>,
        expression3: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        expression1: Box<Expression>,
        expression2: Box<Expression>,
    },
    Unary {
        /// Location of the operator
        #[serde(default)]
        span: SourceSpan,
        op: UnaryOp,
        expression: Box<Expression>,
    },
    Call {
        identifier: Identifier,
        #[serde(default)]
        expressions: Vec<Expression>,
        /// Location of the closing parenthesis
        #[serde(default)]
        close: SourceSpan,
    },
    IdentifierReference {
        identifier: Identifier,
    },
    Parenthesis {
        #[serde(default)]
        span: SourceSpan,
        expression: Box<Expression>,
    },
    LiteralValue {
        value: LiteralValue,
    },
}

impl HasSpan for Expression {
    fn span(&self) -> SourceSpan {
        match self {
            Expression::Ternary { expression1, expression3, .. } => expression1.span() + expression3.span(),
            Expression::Binary { expression1, expression2, .. } => expression1.span() + expression2.span(),
            Expression::Unary { span, expression, .. } => *span + expression.span(),
            Expression::Call { identifier, expressions, close } => expressions
                .iter()
                .fold(identifier.span + *close, |span, e| span + e.span()),
            Expression::IdentifierReference { identifier } => identifier.span,
            Expression::Parenthesis { span, .. } => *span,
            Expression::LiteralValue { value } => value.span(),
        }
    }
}
