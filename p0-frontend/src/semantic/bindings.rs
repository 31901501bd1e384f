//! What a name means during analysis

use crate::ast;
use p0_common::{Type, UnaryOp};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Binding {
    Constant(Type),
    Variable(Type),
    Function {
        parameters: Vec<Type>,
        result: Option<Type>,
    },
}

impl Binding {
    /// The binding a top-level declaration introduces, judged from its shape alone
    pub fn of_declaration(declaration: &ast::Declaration) -> Binding {
        match declaration {
            ast::Declaration::VariableDeclaration { access, expression, .. } => {
                let t = literal_expression_type(expression);
                match access {
                    ast::VariableAccess::ReadOnly => Binding::Constant(t),
                    ast::VariableAccess::ReadWrite => Binding::Variable(t),
                }
            }
            ast::Declaration::FunctionDeclaration { arguments, suffix, .. } => Binding::Function {
                parameters: arguments.iter().map(|(_, t)| Type::from(*t)).collect(),
                result: suffix.as_ref().map(|(t, _)| Type::from(*t)),
            },
        }
    }

    /// `main` when the program declares none
    pub fn entry_placeholder() -> Binding {
        Binding::Function { parameters: Vec::new(), result: None }
    }
}

fn literal_expression_type(expression: &ast::LiteralExpression) -> Type {
    match expression {
        ast::LiteralExpression::Value { value } => literal_value_type(value),
        ast::LiteralExpression::UnaryValue { op: UnaryOp::UnaryNot, .. } => Type::Bool,
        ast::LiteralExpression::UnaryValue { value, .. } => literal_value_type(value),
    }
}

pub(crate) fn literal_value_type(value: &ast::LiteralValue) -> Type {
    match value {
        ast::LiteralValue::Bool { .. } => Type::Bool,
        ast::LiteralValue::Int { .. } => Type::Int,
        ast::LiteralValue::Float { .. } => Type::Float,
        ast::LiteralValue::String { .. } => Type::String,
    }
}
