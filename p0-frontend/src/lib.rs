//! p0 Compiler - Frontend
//!
//! This crate provides the two phases between the parser and the machine:
//! - AST: the syntax tree produced by the external parser
//! - Semantic analysis: name resolution and type checking into the TST
//! - TST: the typed syntax tree
//! - Codegen: lowering of the TST to stack machine bytecode

pub mod ast;
pub mod codegen;
pub mod environment;
pub mod semantic;
pub mod tst;

pub use codegen::{compile, CodeGenerator};
pub use environment::ScopedMap;
pub use semantic::{translate, Binding, Translator};

use log::info;
use p0_bytecode::Module;
use p0_common::CompilerError;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Read a syntax tree serialized as JSON by the parser
    pub fn parse_json(source: &str) -> Result<ast::Program, CompilerError> {
        serde_json::from_str(source).map_err(|e| CompilerError::InvalidInput { message: e.to_string() })
    }

    /// Analyse a program, collecting every diagnostic
    pub fn translate(program: &ast::Program) -> Result<tst::Program, CompilerError> {
        semantic::translate(program).map_err(CompilerError::from)
    }

    /// Analyse and lower a program into a bytecode module
    pub fn compile(program: &ast::Program, module_name: &str) -> Result<Module, CompilerError> {
        let typed = Self::translate(program)?;
        let module = codegen::compile(&typed, module_name)?;

        info!("compiled module '{}'", module.name);
        Ok(module)
    }

    /// `parse_json` followed by `compile`
    pub fn compile_json(source: &str, module_name: &str) -> Result<Module, CompilerError> {
        let program = Self::parse_json(source)?;
        Self::compile(&program, module_name)
    }
}
