//! Types and operators of the p0 language
//!
//! These are shared by the typed syntax tree, the diagnostics and the code
//! generator, which selects instructions by type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved p0 type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    /// Marks an expression whose error has already been reported
    TError,
}

impl Type {
    /// Two types are compatible when they are equal or either one is `TError`
    pub fn compatible(a: Type, b: Type) -> bool {
        a == b || a == Type::TError || b == Type::TError
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_error(&self) -> bool {
        *self == Type::TError
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::Bool => write!(f, "Bool"),
            Type::String => write!(f, "String"),
            Type::TError => write!(f, "<error>"),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Divide,
    Minus,
    Plus,
    Times,
    Equal,
    GreaterEqual,
    GreaterThan,
    LessEqual,
    LessThan,
    NotEqual,
    And,
    Or,
}

impl BinaryOp {
    /// `+ - * /`
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide)
    }

    /// `&& ||`
    pub fn is_boolean(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// `== !=`
    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    /// `< <= > >=`
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::LessThan | BinaryOp::LessEqual | BinaryOp::GreaterThan | BinaryOp::GreaterEqual
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Divide => "/",
            BinaryOp::Minus => "-",
            BinaryOp::Plus => "+",
            BinaryOp::Times => "*",
            BinaryOp::Equal => "==",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::LessThan => "<",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{op}")
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    UnaryNot,
    UnaryMinus,
    UnaryPlus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::UnaryNot => write!(f, "!"),
            UnaryOp::UnaryMinus => write!(f, "-"),
            UnaryOp::UnaryPlus => write!(f, "+"),
        }
    }
}
