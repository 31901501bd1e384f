//! Statement nodes

use super::{Expression, Identifier, VariableAccess};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Assignment {
        identifier: Identifier,
        expression: Expression,
    },
    Declaration {
        access: VariableAccess,
        identifier: Identifier,
        expression: Expression,
    },
    IfThenElse {
        expression: Expression,
        statement1: Box<Statement>,
        #[serde(default)]
        statement2: Option<Box<Statement>>,
    },
    While {
        expression: Expression,
        statement: Box<Statement>,
    },
    Block {
        #[serde(default)]
        statements: Vec<Statement>,
    },
    Call {
        identifier: Identifier,
        #[serde(default)]
        expressions: Vec<Expression>,
    },
    Empty,
}
