//! Errors that abort a compilation
//!
//! User mistakes are `Diagnostic`s and are collected, not thrown. A
//! `CompilerError` either wraps a finished diagnostic list or reports a
//! defect in the compiler itself.

use crate::diagnostic::{self, Diagnostic};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("{}", diagnostic::summary(diagnostics.len()))]
    Diagnostics { diagnostics: Vec<Diagnostic> },

    #[error("Bytecode error: {message}")]
    Bytecode { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    pub fn internal(message: impl Into<String>) -> Self {
        CompilerError::InternalError { message: message.into() }
    }

    /// The diagnostics carried by this error, empty for non-user errors
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompilerError::Diagnostics { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

impl From<Vec<Diagnostic>> for CompilerError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        CompilerError::Diagnostics { diagnostics }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_loc::SourceSpan;

    #[test]
    fn test_diagnostics_error_displays_summary() {
        let err = CompilerError::from(vec![
            Diagnostic::InvalidDeclarationOfMain { span: SourceSpan::default() },
            Diagnostic::UnknownIdentifier { name: "x".to_string(), span: SourceSpan::default() },
        ]);

        assert_eq!(err.to_string(), "2 errors");
        assert_eq!(err.diagnostics().len(), 2);
        assert!(CompilerError::internal("boom").diagnostics().is_empty());
    }
}
