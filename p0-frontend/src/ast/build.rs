//! Shorthand constructors for building trees in code
//!
//! Nodes built here carry no source spans.

use super::{Declaration, Expression, Identifier, LiteralExpression, LiteralValue, Program, Statement, Type, VariableAccess};
use p0_common::{BinaryOp, SourceSpan, UnaryOp};

pub fn id(name: &str) -> Identifier {
    Identifier::new(name, SourceSpan::default())
}

pub fn program(declarations: Vec<Declaration>) -> Program {
    Program { declarations }
}

// Declarations

pub fn global_const(name: &str, expression: LiteralExpression) -> Declaration {
    Declaration::VariableDeclaration { access: VariableAccess::ReadOnly, identifier: id(name), expression }
}

pub fn global_let(name: &str, expression: LiteralExpression) -> Declaration {
    Declaration::VariableDeclaration { access: VariableAccess::ReadWrite, identifier: id(name), expression }
}

pub fn fun(
    name: &str,
    arguments: &[(&str, Type)],
    statements: Vec<Statement>,
    suffix: Option<(Type, Expression)>,
) -> Declaration {
    Declaration::FunctionDeclaration {
        identifier: id(name),
        arguments: arguments.iter().map(|(n, t)| (id(n), *t)).collect(),
        statements,
        suffix,
    }
}

/// `main { ... }`
pub fn main(statements: Vec<Statement>) -> Declaration {
    fun("main", &[], statements, None)
}

// Literals

pub fn lit(value: LiteralValue) -> LiteralExpression {
    LiteralExpression::Value { value }
}

pub fn signed_lit(op: UnaryOp, value: LiteralValue) -> LiteralExpression {
    LiteralExpression::UnaryValue { span: SourceSpan::default(), op, value }
}

pub fn int_value(text: &str) -> LiteralValue {
    LiteralValue::Int { value: text.to_string(), span: SourceSpan::default() }
}

pub fn float_value(text: &str) -> LiteralValue {
    LiteralValue::Float { value: text.to_string(), span: SourceSpan::default() }
}

pub fn bool_value(value: bool) -> LiteralValue {
    LiteralValue::Bool { value, span: SourceSpan::default() }
}

/// A string literal; `source` is the text between the quotes as written
pub fn string_value(source: &str) -> LiteralValue {
    LiteralValue::String { value: format!("\"{source}\""), span: SourceSpan::default() }
}

// Expressions

pub fn int(text: &str) -> Expression {
    Expression::LiteralValue { value: int_value(text) }
}

pub fn float(text: &str) -> Expression {
    Expression::LiteralValue { value: float_value(text) }
}

pub fn boolean(value: bool) -> Expression {
    Expression::LiteralValue { value: bool_value(value) }
}

pub fn string(source: &str) -> Expression {
    Expression::LiteralValue { value: string_value(source) }
}

pub fn var(name: &str) -> Expression {
    Expression::IdentifierReference { identifier: id(name) }
}

pub fn binary(op: BinaryOp, e1: Expression, e2: Expression) -> Expression {
    Expression::Binary { op, expression1: Box::new(e1), expression2: Box::new(e2) }
}

pub fn unary(op: UnaryOp, e: Expression) -> Expression {
    Expression::Unary { span: SourceSpan::default(), op, expression: Box::new(e) }
}

pub fn ternary(guard: Expression, then: Expression, otherwise: Expression) -> Expression {
    Expression::Ternary {
        expression1: Box::new(guard),
        expression2: Box::new(then),
        expression3: Box::new(otherwise),
    }
}

pub fn paren(e: Expression) -> Expression {
    Expression::Parenthesis { span: SourceSpan::default(), expression: Box::new(e) }
}

pub fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Call { identifier: id(name), expressions: arguments, close: SourceSpan::default() }
}

// Statements

pub fn assign(name: &str, expression: Expression) -> Statement {
    Statement::Assignment { identifier: id(name), expression }
}

pub fn let_var(name: &str, expression: Expression) -> Statement {
    Statement::Declaration { access: VariableAccess::ReadWrite, identifier: id(name), expression }
}

pub fn const_var(name: &str, expression: Expression) -> Statement {
    Statement::Declaration { access: VariableAccess::ReadOnly, identifier: id(name), expression }
}

pub fn if_then(guard: Expression, then: Statement) -> Statement {
    Statement::IfThenElse { expression: guard, statement1: Box::new(then), statement2: None }
}

pub fn if_then_else(guard: Expression, then: Statement, otherwise: Statement) -> Statement {
    Statement::IfThenElse {
        expression: guard,
        statement1: Box::new(then),
        statement2: Some(Box::new(otherwise)),
    }
}

pub fn while_do(guard: Expression, body: Statement) -> Statement {
    Statement::While { expression: guard, statement: Box::new(body) }
}

pub fn block(statements: Vec<Statement>) -> Statement {
    Statement::Block { statements }
}

pub fn call_stmt(name: &str, arguments: Vec<Expression>) -> Statement {
    Statement::Call { identifier: id(name), expressions: arguments }
}
