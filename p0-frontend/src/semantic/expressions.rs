//! Expression analysis

use super::{Binding, Translator};
use crate::{ast, tst};
use p0_common::{BinaryOp, Diagnostic, HasSpan, Type, UnaryOp};

impl Translator {
    pub(super) fn expression(&mut self, expression: &ast::Expression) -> tst::Expression {
        match expression {
            ast::Expression::Ternary { expression1, expression2, expression3 } => {
                let guard = self.expression(expression1);
                let then = self.expression(expression2);
                let otherwise = self.expression(expression3);

                if !Type::compatible(guard.type_of(), Type::Bool) {
                    self.report(Diagnostic::TernaryExpressionNotBoolean {
                        guard_span: expression1.span(),
                        span: expression.span(),
                    });
                }
                if !Type::compatible(then.type_of(), otherwise.type_of()) {
                    self.report(Diagnostic::TernaryExpressionResultIncompatible {
                        then_span: expression2.span(),
                        else_span: expression3.span(),
                    });
                }

                tst::Expression::Ternary {
                    guard: Box::new(guard),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                }
            }

            ast::Expression::Binary { op, expression1, expression2 } => {
                self.binary(*op, expression1, expression2)
            }

            ast::Expression::Unary { span, op, expression: operand } => {
                // -digits folds into a single signed literal
                if let (UnaryOp::UnaryMinus, ast::Expression::LiteralValue { value }) = (op, operand.as_ref()) {
                    if let ast::LiteralValue::Int { value: digits, span: digits_span } = value {
                        let value = self.negative_int(digits, *span + *digits_span);
                        return tst::Expression::Literal { value };
                    }
                }

                let operand_typed = self.expression(operand);
                let operand_type = operand_typed.type_of();

                let (accepted, expr_type) = match op {
                    UnaryOp::UnaryNot => (operand_type == Type::Bool, Type::Bool),
                    UnaryOp::UnaryMinus | UnaryOp::UnaryPlus => (operand_type.is_numeric(), operand_type),
                };
                if !accepted && !operand_type.is_error() {
                    self.report(Diagnostic::UnaryExpressionRequiresOperandType {
                        op: *op,
                        operand_type,
                        span: operand.span(),
                    });
                }

                tst::Expression::Unary { expr_type, op: *op, operand: Box::new(operand_typed) }
            }

            ast::Expression::Call { identifier, expressions, .. } => self.call_expression(identifier, expressions),

            ast::Expression::IdentifierReference { identifier } => {
                let name = identifier.name.clone();

                let expr_type = match self.env.get(&name).cloned() {
                    Some(Binding::Constant(t)) | Some(Binding::Variable(t)) => t,
                    Some(Binding::Function { .. }) => {
                        self.report(Diagnostic::UnableToReferenceFunction { name: name.clone(), span: identifier.span });
                        Type::TError
                    }
                    None => {
                        self.report(Diagnostic::UnknownIdentifier { name: name.clone(), span: identifier.span });
                        Type::TError
                    }
                };

                tst::Expression::IdentifierReference { expr_type, name }
            }

            ast::Expression::Parenthesis { expression, .. } => self.expression(expression),

            ast::Expression::LiteralValue { value } => tst::Expression::Literal { value: self.literal_value(value) },
        }
    }

    /// Operand requirements depend on the operator category. An operand that
    /// already failed its own requirement is not compared with the other one.
    fn binary(&mut self, op: BinaryOp, e1: &ast::Expression, e2: &ast::Expression) -> tst::Expression {
        let left = self.expression(e1);
        let right = self.expression(e2);
        let (left_type, right_type) = (left.type_of(), right.type_of());

        let accepts = |t: Type| {
            t.is_error()
                || if op.is_boolean() {
                    t == Type::Bool
                } else if op.is_equality() {
                    true
                } else {
                    t.is_numeric()
                }
        };

        let left_ok = accepts(left_type);
        let right_ok = accepts(right_type);

        if !left_ok {
            self.report(Diagnostic::BinaryExpressionRequiresOperandType { op, operand_type: left_type, span: e1.span() });
        }
        if !right_ok {
            self.report(Diagnostic::BinaryExpressionRequiresOperandType { op, operand_type: right_type, span: e2.span() });
        }
        if left_ok && right_ok && !Type::compatible(left_type, right_type) {
            self.report(Diagnostic::BinaryExpressionOperandsIncompatible {
                op,
                left_span: e1.span(),
                left_type,
                right_span: e2.span(),
                right_type,
            });
        }

        tst::Expression::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    /// A call used as a value; it must name a function with a result
    fn call_expression(&mut self, identifier: &ast::Identifier, arguments: &[ast::Expression]) -> tst::Expression {
        let name = identifier.name.clone();

        match self.env.get(&name).cloned() {
            Some(Binding::Constant(_)) => {
                self.report(Diagnostic::UnableToCallConstantAsFunction { name: name.clone(), span: identifier.span });
                tst::Expression::Call { expr_type: Type::TError, name, arguments: Vec::new() }
            }

            Some(Binding::Variable(_)) => {
                self.report(Diagnostic::UnableToCallVariableAsFunction { name: name.clone(), span: identifier.span });
                tst::Expression::Call { expr_type: Type::TError, name, arguments: Vec::new() }
            }

            Some(Binding::Function { parameters, result }) => {
                let arguments = self.call_arguments(identifier, &parameters, arguments);

                let expr_type = match result {
                    Some(t) => t,
                    None => {
                        self.report(Diagnostic::UnableToCallUnitFunctionAsValueFunction {
                            name: name.clone(),
                            span: identifier.span,
                        });
                        Type::TError
                    }
                };

                tst::Expression::Call { expr_type, name, arguments }
            }

            None => {
                self.report(Diagnostic::UnknownIdentifier { name: name.clone(), span: identifier.span });
                tst::Expression::IdentifierReference { expr_type: Type::TError, name }
            }
        }
    }

    /// Analyse call arguments and check them against the parameter list.
    /// Types are only compared when the counts agree.
    pub(super) fn call_arguments(
        &mut self,
        identifier: &ast::Identifier,
        parameters: &[Type],
        arguments: &[ast::Expression],
    ) -> Vec<tst::Expression> {
        let typed: Vec<tst::Expression> = arguments.iter().map(|a| self.expression(a)).collect();

        if typed.len() != parameters.len() {
            self.report(Diagnostic::MismatchInNumberOfParameters {
                arguments: typed.len(),
                parameters: parameters.len(),
                span: identifier.span,
            });
        } else {
            for ((argument, source), parameter_type) in typed.iter().zip(arguments).zip(parameters) {
                if !Type::compatible(argument.type_of(), *parameter_type) {
                    self.report(Diagnostic::IncompatibleArgumentType {
                        argument_type: argument.type_of(),
                        parameter_type: *parameter_type,
                        span: source.span(),
                    });
                }
            }
        }

        typed
    }
}
