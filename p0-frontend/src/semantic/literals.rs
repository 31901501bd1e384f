//! Literal elaboration
//!
//! Turns literal source text into values. Overflow is reported and analysis
//! carries on with a substitute value.

use super::bindings::literal_value_type;
use super::Translator;
use crate::{ast, tst};
use p0_common::{Diagnostic, HasSpan, SourceSpan, UnaryOp};

impl Translator {
    /// Initializer of a top-level constant or variable
    pub(super) fn literal_expression(&mut self, expression: &ast::LiteralExpression) -> tst::LiteralValue {
        match expression {
            ast::LiteralExpression::Value { value } => self.literal_value(value),
            ast::LiteralExpression::UnaryValue { span, op, value } => match (op, value) {
                (UnaryOp::UnaryMinus, ast::LiteralValue::Int { value: digits, span: digits_span }) => {
                    self.negative_int(digits, *span + *digits_span)
                }
                (UnaryOp::UnaryMinus, ast::LiteralValue::Float { value: digits, span: digits_span }) => {
                    self.float(&format!("-{digits}"), *span + *digits_span)
                }
                (UnaryOp::UnaryPlus, ast::LiteralValue::Int { .. } | ast::LiteralValue::Float { .. }) => {
                    self.literal_value(value)
                }
                (UnaryOp::UnaryNot, ast::LiteralValue::Bool { value: b, .. }) => tst::LiteralValue::Bool(!b),
                _ => {
                    self.report(Diagnostic::UnaryExpressionRequiresOperandType {
                        op: *op,
                        operand_type: literal_value_type(value),
                        span: value.span(),
                    });
                    self.literal_value(value)
                }
            },
        }
    }

    pub(super) fn literal_value(&mut self, value: &ast::LiteralValue) -> tst::LiteralValue {
        match value {
            ast::LiteralValue::Bool { value, .. } => tst::LiteralValue::Bool(*value),
            ast::LiteralValue::Int { value, span } => self.int(value, *span),
            ast::LiteralValue::Float { value, span } => self.float(value, *span),
            ast::LiteralValue::String { value, .. } => tst::LiteralValue::String(unescape(value)),
        }
    }

    /// `-digits` as one literal, so the most negative int is representable
    pub(super) fn negative_int(&mut self, digits: &str, span: SourceSpan) -> tst::LiteralValue {
        self.int(&format!("-{digits}"), span)
    }

    fn int(&mut self, text: &str, span: SourceSpan) -> tst::LiteralValue {
        match text.parse::<i32>() {
            Ok(v) => tst::LiteralValue::Int(v),
            Err(_) => {
                self.report(Diagnostic::LiteralIntOverflow { text: text.to_string(), span });
                tst::LiteralValue::Int(0)
            }
        }
    }

    fn float(&mut self, text: &str, span: SourceSpan) -> tst::LiteralValue {
        match text.parse::<f32>() {
            Ok(v) => {
                if v.is_infinite() {
                    self.report(Diagnostic::LiteralFloatOverflow { text: text.to_string(), span });
                }
                tst::LiteralValue::Float(v)
            }
            Err(_) => {
                self.report(Diagnostic::LiteralFloatOverflow { text: text.to_string(), span });
                tst::LiteralValue::Float(0.0)
            }
        }
    }
}

/// Strip the quotes from a string literal and resolve its escapes.
/// `\\` is a backslash; a backslash followed by anything else is a quote.
pub(crate) fn unescape(source: &str) -> String {
    let mut result = String::new();
    let mut chars = source.chars();

    if chars.next() != Some('"') {
        return source.to_string();
    }

    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('\\') => result.push('\\'),
                Some(_) => result.push('"'),
                None => break,
            },
            c => result.push(c),
        }
    }

    result
}
