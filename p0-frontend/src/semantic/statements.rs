//! Statement analysis
//!
//! Statements run against the current environment. Local declarations
//! extend the innermost scope, so later statements of the same block see
//! them. Blocks, if branches and while bodies each get a scope of their own.

use super::{Binding, Translator};
use crate::{ast, tst};
use p0_common::{Diagnostic, HasSpan, Type};

const PRINT: &str = "print";
const PRINTLN: &str = "println";

impl Translator {
    pub(super) fn statements(&mut self, statements: &[ast::Statement]) -> Vec<tst::Statement> {
        statements.iter().map(|s| self.statement(s)).collect()
    }

    pub(super) fn statement(&mut self, statement: &ast::Statement) -> tst::Statement {
        match statement {
            ast::Statement::Assignment { identifier, expression } => {
                let value = self.expression(expression);
                let name = &identifier.name;

                match self.env.get(name).cloned() {
                    None => self.report(Diagnostic::UnknownIdentifier { name: name.clone(), span: identifier.span }),
                    Some(Binding::Constant(_)) => {
                        self.report(Diagnostic::UnableToAssignToConstant { name: name.clone(), span: identifier.span })
                    }
                    Some(Binding::Function { .. }) => {
                        self.report(Diagnostic::UnableToAssignToFunction { name: name.clone(), span: identifier.span })
                    }
                    Some(Binding::Variable(variable_type)) => {
                        if !Type::compatible(variable_type, value.type_of()) {
                            self.report(Diagnostic::UnableToAssignIncompatibleTypes {
                                variable_type,
                                span: identifier.span,
                                expression_type: value.type_of(),
                                expression_span: expression.span(),
                            });
                        }
                    }
                }

                tst::Statement::Assignment { name: name.clone(), expression: value }
            }

            ast::Statement::Declaration { access, identifier, expression } => {
                let value = self.expression(expression);
                let name = identifier.name.clone();

                match access {
                    ast::VariableAccess::ReadOnly => {
                        self.env.insert(name.clone(), Binding::Constant(value.type_of()));
                        tst::Statement::ConstantDeclaration { name, expression: value }
                    }
                    ast::VariableAccess::ReadWrite => {
                        self.env.insert(name.clone(), Binding::Variable(value.type_of()));
                        tst::Statement::VariableDeclaration { name, expression: value }
                    }
                }
            }

            ast::Statement::IfThenElse { expression, statement1, statement2 } => {
                let guard = self.expression(expression);
                if !Type::compatible(guard.type_of(), Type::Bool) {
                    self.report(Diagnostic::IfGuardNotBoolean { guard_type: guard.type_of(), span: expression.span() });
                }

                let then = self.scoped(|t| t.statement(statement1));
                let otherwise = statement2.as_ref().map(|s| self.scoped(|t| t.statement(s)));

                tst::Statement::IfThenElse {
                    guard,
                    then: Box::new(then),
                    otherwise: otherwise.map(Box::new),
                }
            }

            ast::Statement::While { expression, statement } => {
                let guard = self.expression(expression);
                if !Type::compatible(guard.type_of(), Type::Bool) {
                    self.report(Diagnostic::WhileGuardNotBoolean { guard_type: guard.type_of(), span: expression.span() });
                }

                let body = self.scoped(|t| t.statement(statement));
                tst::Statement::While { guard, body: Box::new(body) }
            }

            ast::Statement::Block { statements } => {
                let statements = self.scoped(|t| t.statements(statements));
                tst::Statement::Block { statements }
            }

            ast::Statement::Call { identifier, expressions } => self.call_statement(identifier, expressions),

            ast::Statement::Empty => tst::Statement::Empty,
        }
    }

    /// A call whose result, if any, is discarded. Only unit functions and the
    /// `print`/`println` built-ins belong here; a value function is reported
    /// but the call is kept for its side effects.
    fn call_statement(&mut self, identifier: &ast::Identifier, arguments: &[ast::Expression]) -> tst::Statement {
        let name = &identifier.name;

        match self.env.get(name).cloned() {
            Some(Binding::Constant(_)) => {
                self.report(Diagnostic::UnableToCallConstantAsFunction { name: name.clone(), span: identifier.span });
                tst::Statement::Call { callee: tst::Callee::Function(name.clone()), arguments: Vec::new() }
            }

            Some(Binding::Variable(_)) => {
                self.report(Diagnostic::UnableToCallVariableAsFunction { name: name.clone(), span: identifier.span });
                tst::Statement::Call { callee: tst::Callee::Function(name.clone()), arguments: Vec::new() }
            }

            Some(Binding::Function { parameters, result }) => {
                let arguments = self.call_arguments(identifier, &parameters, arguments);

                if result.is_some() {
                    self.report(Diagnostic::UnableToCallValueFunctionAsUnitFunction {
                        name: name.clone(),
                        span: identifier.span,
                    });
                }

                tst::Statement::Call { callee: tst::Callee::Function(name.clone()), arguments }
            }

            None if name == PRINT || name == PRINTLN => {
                let callee = if name == PRINT { tst::Callee::Print } else { tst::Callee::Println };
                let arguments = arguments.iter().map(|a| self.expression(a)).collect();

                tst::Statement::Call { callee, arguments }
            }

            None => {
                self.report(Diagnostic::UnknownIdentifier { name: name.clone(), span: identifier.span });
                tst::Statement::Call { callee: tst::Callee::Function(name.clone()), arguments: Vec::new() }
            }
        }
    }
}
