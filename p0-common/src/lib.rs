//! p0 Compiler - Common Types and Utilities
//!
//! This crate contains the data shared by every phase of the p0 compiler:
//! source locations, the token interface of the external scanner, the
//! language's types and operators, and the diagnostic taxonomy.

pub mod diagnostic;
pub mod error;
pub mod source_loc;
pub mod token;
pub mod types;

pub use diagnostic::{Diagnostic, Diagnostics};
pub use error::CompilerError;
pub use source_loc::{HasSpan, SourceLocation, SourceSpan};
pub use token::{Token, TokenKind};
pub use types::{BinaryOp, Type, UnaryOp};
