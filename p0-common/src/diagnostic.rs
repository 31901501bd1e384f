//! User-facing diagnostics
//!
//! Every variant carries the names, types and spans needed to render its
//! message, so a diagnostic can be printed long after the tree it came from
//! has been dropped.

use crate::source_loc::SourceSpan;
use crate::token::{Token, TokenKind};
use crate::types::{BinaryOp, Type, UnaryOp};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    #[error("{}: unexpected {found}, expected {}", found.span, expected_list(expected))]
    ParseError { found: Token, expected: Vec<TokenKind> },

    #[error("{}: lexical error at {token}", token.span)]
    LexicalError { token: Token },

    #[error("{span}: attempt to redefine '{name}'")]
    AttemptToRedefineDeclaration { name: String, span: SourceSpan },

    #[error("{}: operands of '{op}' are incompatible: {left_type} and {right_type}", *left_span + *right_span)]
    BinaryExpressionOperandsIncompatible {
        op: BinaryOp,
        left_span: SourceSpan,
        left_type: Type,
        right_span: SourceSpan,
        right_type: Type,
    },

    #[error("{span}: operator '{op}' does not accept an operand of type {operand_type}")]
    BinaryExpressionRequiresOperandType { op: BinaryOp, operand_type: Type, span: SourceSpan },

    #[error("{span}: function '{name}' should return {expected} but returns {found}")]
    FunctionReturnTypeMismatch { name: String, expected: Type, found: Type, span: SourceSpan },

    #[error("{span}: if guard must be Bool, found {guard_type}")]
    IfGuardNotBoolean { guard_type: Type, span: SourceSpan },

    #[error("{span}: main must be a function without parameters or result type")]
    InvalidDeclarationOfMain { span: SourceSpan },

    #[error("{span}: argument of type {argument_type} passed where {parameter_type} is expected")]
    IncompatibleArgumentType { argument_type: Type, parameter_type: Type, span: SourceSpan },

    #[error("{span}: float literal {text} overflows")]
    LiteralFloatOverflow { text: String, span: SourceSpan },

    #[error("{span}: int literal {text} overflows")]
    LiteralIntOverflow { text: String, span: SourceSpan },

    #[error("{span}: call passes {arguments} argument(s) but {parameters} parameter(s) are declared")]
    MismatchInNumberOfParameters { arguments: usize, parameters: usize, span: SourceSpan },

    #[error("{}: branches of the ternary expression have different types", *then_span + *else_span)]
    TernaryExpressionResultIncompatible { then_span: SourceSpan, else_span: SourceSpan },

    #[error("{guard_span}: ternary guard must be Bool")]
    TernaryExpressionNotBoolean { guard_span: SourceSpan, span: SourceSpan },

    #[error("{span}: unable to assign to constant '{name}'")]
    UnableToAssignToConstant { name: String, span: SourceSpan },

    #[error("{expression_span}: unable to assign {expression_type} to a variable of type {variable_type}")]
    UnableToAssignIncompatibleTypes {
        variable_type: Type,
        span: SourceSpan,
        expression_type: Type,
        expression_span: SourceSpan,
    },

    #[error("{span}: unable to assign to function '{name}'")]
    UnableToAssignToFunction { name: String, span: SourceSpan },

    #[error("{span}: function '{name}' has no result and cannot be used as a value")]
    UnableToCallUnitFunctionAsValueFunction { name: String, span: SourceSpan },

    #[error("{span}: constant '{name}' cannot be called")]
    UnableToCallConstantAsFunction { name: String, span: SourceSpan },

    #[error("{span}: variable '{name}' cannot be called")]
    UnableToCallVariableAsFunction { name: String, span: SourceSpan },

    #[error("{span}: operator '{op}' does not accept an operand of type {operand_type}")]
    UnaryExpressionRequiresOperandType { op: UnaryOp, operand_type: Type, span: SourceSpan },

    #[error("{span}: function '{name}' cannot be referenced as a value")]
    UnableToReferenceFunction { name: String, span: SourceSpan },

    #[error("{span}: function '{name}' returns a value and cannot be called as a statement")]
    UnableToCallValueFunctionAsUnitFunction { name: String, span: SourceSpan },

    #[error("{span}: unknown identifier '{name}'")]
    UnknownIdentifier { name: String, span: SourceSpan },

    #[error("{span}: while guard must be Bool, found {guard_type}")]
    WhileGuardNotBoolean { guard_type: Type, span: SourceSpan },
}

fn expected_list(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => "nothing".to_string(),
        [only] => format!("'{only}'"),
        _ => {
            let quoted: Vec<String> = kinds.iter().map(|k| format!("'{k}'")).collect();
            format!("one of {}", quoted.join(", "))
        }
    }
}

impl Diagnostic {
    /// The source region this diagnostic points at
    pub fn span(&self) -> SourceSpan {
        match self {
            Diagnostic::ParseError { found, .. } => found.span,
            Diagnostic::LexicalError { token } => token.span,
            Diagnostic::BinaryExpressionOperandsIncompatible { left_span, right_span, .. } => {
                *left_span + *right_span
            }
            Diagnostic::TernaryExpressionResultIncompatible { then_span, else_span } => {
                *then_span + *else_span
            }
            Diagnostic::UnableToAssignIncompatibleTypes { span, expression_span, .. } => {
                *span + *expression_span
            }
            Diagnostic::AttemptToRedefineDeclaration { span, .. }
            | Diagnostic::BinaryExpressionRequiresOperandType { span, .. }
            | Diagnostic::FunctionReturnTypeMismatch { span, .. }
            | Diagnostic::IfGuardNotBoolean { span, .. }
            | Diagnostic::InvalidDeclarationOfMain { span }
            | Diagnostic::IncompatibleArgumentType { span, .. }
            | Diagnostic::LiteralFloatOverflow { span, .. }
            | Diagnostic::LiteralIntOverflow { span, .. }
            | Diagnostic::MismatchInNumberOfParameters { span, .. }
            | Diagnostic::TernaryExpressionNotBoolean { span, .. }
            | Diagnostic::UnableToAssignToConstant { span, .. }
            | Diagnostic::UnableToAssignToFunction { span, .. }
            | Diagnostic::UnableToCallUnitFunctionAsValueFunction { span, .. }
            | Diagnostic::UnableToCallConstantAsFunction { span, .. }
            | Diagnostic::UnableToCallVariableAsFunction { span, .. }
            | Diagnostic::UnaryExpressionRequiresOperandType { span, .. }
            | Diagnostic::UnableToReferenceFunction { span, .. }
            | Diagnostic::UnableToCallValueFunctionAsUnitFunction { span, .. }
            | Diagnostic::UnknownIdentifier { span, .. }
            | Diagnostic::WhileGuardNotBoolean { span, .. } => *span,
        }
    }
}

/// Accumulates diagnostics in the order they are reported
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        summary(self.diagnostics.len())
    }
}

/// "1 error", "3 errors", ...
pub fn summary(count: usize) -> String {
    match count {
        0 => "No errors".to_string(),
        1 => "1 error".to_string(),
        n => format!("{n} errors"),
    }
}
