//! Typed Syntax Tree
//!
//! The output of the translator. Names are resolved, literals are parsed and
//! every expression knows its type. A `Program` is only ever handed out when
//! translation produced no diagnostics.

mod expressions;
mod statements;

pub use expressions::{Expression, LiteralValue};
pub use statements::{Callee, Statement};

use p0_common::Type;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    /// The hoisted body of `main`, `Empty` when there is none
    pub statement: Statement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Declaration {
    Constant { name: String, value: LiteralValue },
    Variable { name: String, value: LiteralValue },
    Function(FunctionDeclaration),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Constant { name, .. } | Declaration::Variable { name, .. } => name,
            Declaration::Function(function) => &function.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<(String, Type)>,
    pub body: Vec<Statement>,
    /// Tail expression for functions with a result
    pub result: Option<Expression>,
}
