//! Abstract Syntax Tree for p0
//!
//! The untyped tree built by the external parser. Nodes are plain data that
//! can also be read from JSON; any span that is missing defaults to the
//! empty location.

pub mod build;
mod expressions;
mod statements;

pub use expressions::{Expression, LiteralValue};
pub use statements::Statement;

use p0_common::{HasSpan, SourceSpan};
use serde::Deserialize;

/// A name together with where it was written
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(default)]
    pub span: SourceSpan,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self { name: name.into(), span }
    }
}

/// `const` or `let`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum VariableAccess {
    ReadOnly,
    ReadWrite,
}

/// Type annotation as written in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Type {
    Int,
    Float,
    Bool,
}

impl From<Type> for p0_common::Type {
    fn from(t: Type) -> Self {
        match t {
            Type::Int => p0_common::Type::Int,
            Type::Float => p0_common::Type::Float,
            Type::Bool => p0_common::Type::Bool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum Declaration {
    VariableDeclaration {
        access: VariableAccess,
        identifier: Identifier,
        expression: LiteralExpression,
    },
    FunctionDeclaration {
        identifier: Identifier,
        #[serde(default)]
        arguments: Vec<(Identifier, Type)>,
        #[serde(default)]
        statements: Vec<Statement>,
        #[serde(default)]
        suffix: Option<(Type, Expression)>,
    },
}

impl Declaration {
    pub fn identifier(&self) -> &Identifier {
        match self {
            Declaration::VariableDeclaration { identifier, .. }
            | Declaration::FunctionDeclaration { identifier, .. } => identifier,
        }
    }
}

/// Initializer of a top-level constant or variable: a literal, optionally signed or negated
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum LiteralExpression {
    Value {
        value: LiteralValue,
    },
    UnaryValue {
        #[serde(default)]
        span: SourceSpan,
        op: p0_common::UnaryOp,
        value: LiteralValue,
    },
}

impl HasSpan for LiteralExpression {
    fn span(&self) -> SourceSpan {
        match self {
            LiteralExpression::Value { value } => value.span(),
            LiteralExpression::UnaryValue { span, value, .. } => *span + value.span(),
        }
    }
}
