//! Code generation from the typed syntax tree to stack machine bytecode
//!
//! Top-level constants and variables become static fields of the module,
//! each function becomes a static routine, and the program statement
//! becomes the entry routine `main`. The input must be a TST that
//! translated without diagnostics; anything else is an internal error.

mod expressions;
mod slots;
mod statements;

#[cfg(test)]
mod tests;

pub use slots::SlotEnvironment;

use crate::tst;
use log::{debug, trace};
use p0_bytecode::{BytecodeError, CodeBuilder, Constant, Field, FieldType, Function, Instruction, MethodDescriptor, Module};
use p0_common::{CompilerError, Type};

pub const ENTRY_ROUTINE: &str = "main";
pub const INITIALIZER: &str = "<init>";

/// Locale-independent decimals used when printing floats
pub const FLOAT_PRINT_PRECISION: u8 = 6;

/// Compile a diagnostic-free program into a module named `module_name`
pub fn compile(program: &tst::Program, module_name: &str) -> Result<Module, CompilerError> {
    CodeGenerator::new(module_name).generate(program)
}

pub struct CodeGenerator {
    module: Module,
}

impl CodeGenerator {
    pub fn new(module_name: &str) -> Self {
        Self { module: Module::new(module_name) }
    }

    pub fn generate(mut self, program: &tst::Program) -> Result<Module, CompilerError> {
        debug!("generating module '{}'", self.module.name);

        self.add_initializer();

        for declaration in &program.declarations {
            match declaration {
                tst::Declaration::Constant { name, value } => self.add_field(name, value, true)?,
                tst::Declaration::Variable { name, value } => self.add_field(name, value, false)?,
                tst::Declaration::Function(function) => self.add_function(function)?,
            }
        }

        self.add_entry_routine(&program.statement)?;

        debug!(
            "module '{}': {} field(s), {} routine(s)",
            self.module.name,
            self.module.fields.len(),
            self.module.functions.len()
        );
        Ok(self.module)
    }

    fn add_initializer(&mut self) {
        self.module.add_function(Function {
            name: INITIALIZER.to_string(),
            descriptor: MethodDescriptor::void(),
            max_locals: 0,
            code: vec![Instruction::Return],
        });
    }

    fn add_field(&mut self, name: &str, value: &tst::LiteralValue, is_final: bool) -> Result<(), CompilerError> {
        let initial = match value {
            tst::LiteralValue::Bool(v) => Constant::Bool(*v),
            tst::LiteralValue::Int(v) => Constant::Int(*v),
            tst::LiteralValue::Float(v) => Constant::Float(*v),
            tst::LiteralValue::String(v) => Constant::String(v.clone()),
        };

        self.module.add_field(Field {
            name: name.to_string(),
            is_final,
            field_type: field_type(value.type_of())?,
            initial,
        });
        Ok(())
    }

    fn add_function(&mut self, function: &tst::FunctionDeclaration) -> Result<(), CompilerError> {
        let mut compiler = FunctionCompiler::new(&self.module.name, SlotEnvironment::new(0));

        for (name, _) in &function.parameters {
            compiler.slots.new_binding(name)?;
        }
        for statement in &function.body {
            compiler.statement(statement)?;
        }

        match &function.result {
            None => compiler.builder.emit(Instruction::Return),
            Some(result) => {
                compiler.expression(result)?;
                let ret = match result.type_of() {
                    Type::Int | Type::Bool => Instruction::IReturn,
                    Type::Float => Instruction::FReturn,
                    other => {
                        return Err(CompilerError::internal(format!(
                            "function '{}' returns unsupported type {other}",
                            function.name
                        )))
                    }
                };
                compiler.builder.emit(ret);
            }
        }

        let parameter_types: Vec<Type> = function.parameters.iter().map(|(_, t)| *t).collect();
        let descriptor = descriptor(&parameter_types, function.result.as_ref().map(|e| e.type_of()))?;

        let routine = compiler.finish(&function.name, descriptor)?;
        self.module.add_function(routine);
        Ok(())
    }

    /// `main` runs the program statement; slot 0 holds its implicit argument
    fn add_entry_routine(&mut self, statement: &tst::Statement) -> Result<(), CompilerError> {
        let mut compiler = FunctionCompiler::new(&self.module.name, SlotEnvironment::new(1));

        compiler.statement(statement)?;
        compiler.builder.emit(Instruction::Return);

        let routine = compiler.finish(ENTRY_ROUTINE, MethodDescriptor::void())?;
        self.module.add_function(routine);
        Ok(())
    }
}

/// Lowers the statements of one routine
pub(crate) struct FunctionCompiler<'a> {
    owner: &'a str,
    slots: SlotEnvironment,
    builder: CodeBuilder,
}

impl<'a> FunctionCompiler<'a> {
    fn new(owner: &'a str, slots: SlotEnvironment) -> Self {
        Self { owner, slots, builder: CodeBuilder::new() }
    }

    fn finish(self, name: &str, descriptor: MethodDescriptor) -> Result<Function, CompilerError> {
        let max_locals = self.slots.max_locals();
        let code = self.builder.finish().map_err(bytecode_error)?;

        trace!("routine {} {}: {} instruction(s), {} local(s)", name, descriptor, code.len(), max_locals);
        Ok(Function { name: name.to_string(), descriptor, max_locals, code })
    }
}

/// Storage type of a value; `TError` never reaches this point
pub(crate) fn field_type(t: Type) -> Result<FieldType, CompilerError> {
    match t {
        Type::Int => Ok(FieldType::Int),
        Type::Float => Ok(FieldType::Float),
        Type::Bool => Ok(FieldType::Bool),
        Type::String => Ok(FieldType::String),
        Type::TError => Err(CompilerError::internal("error type reached code generation")),
    }
}

pub(crate) fn descriptor(parameters: &[Type], result: Option<Type>) -> Result<MethodDescriptor, CompilerError> {
    let parameters = parameters.iter().map(|t| field_type(*t)).collect::<Result<Vec<_>, _>>()?;
    let result = result.map(field_type).transpose()?;
    Ok(MethodDescriptor::new(parameters, result))
}

fn bytecode_error(err: BytecodeError) -> CompilerError {
    CompilerError::Bytecode { message: err.to_string() }
}
