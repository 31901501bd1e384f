//! Typed statements

use super::Expression;
use serde::Serialize;

/// Target of a call statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Callee {
    Function(String),
    /// Built-in `print`
    Print,
    /// Built-in `println`
    Println,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Assignment {
        name: String,
        expression: Expression,
    },
    ConstantDeclaration {
        name: String,
        expression: Expression,
    },
    VariableDeclaration {
        name: String,
        expression: Expression,
    },
    IfThenElse {
        guard: Expression,
        then: Box<Statement>,
        otherwise: Option<Box<Statement>>,
    },
    While {
        guard: Expression,
        body: Box<Statement>,
    },
    Block {
        statements: Vec<Statement>,
    },
    Call {
        callee: Callee,
        arguments: Vec<Expression>,
    },
    Empty,
}
