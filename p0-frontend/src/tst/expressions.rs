//! Typed expressions

use p0_common::{BinaryOp, Type, UnaryOp};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
}

impl LiteralValue {
    pub fn type_of(&self) -> Type {
        match self {
            LiteralValue::Bool(_) => Type::Bool,
            LiteralValue::Int(_) => Type::Int,
            LiteralValue::Float(_) => Type::Float,
            LiteralValue::String(_) => Type::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Expression {
    Ternary {
        guard: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        expr_type: Type,
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Call {
        expr_type: Type,
        name: String,
        arguments: Vec<Expression>,
    },
    IdentifierReference {
        expr_type: Type,
        name: String,
    },
    Literal {
        value: LiteralValue,
    },
}

impl Expression {
    pub fn type_of(&self) -> Type {
        match self {
            Expression::Ternary { then, .. } => then.type_of(),
            Expression::Binary { op, left, right } => {
                if op.is_arithmetic() {
                    let (l, r) = (left.type_of(), right.type_of());
                    if l == r && l.is_numeric() {
                        l
                    } else {
                        Type::TError
                    }
                } else {
                    Type::Bool
                }
            }
            Expression::Unary { expr_type, .. }
            | Expression::Call { expr_type, .. }
            | Expression::IdentifierReference { expr_type, .. } => *expr_type,
            Expression::Literal { value } => value.type_of(),
        }
    }
}
