//! Statement lowering

use super::{descriptor, field_type, FunctionCompiler, FLOAT_PRINT_PRECISION};
use crate::tst;
use p0_bytecode::{Condition, FieldRef, Instruction, MethodRef};
use p0_common::{CompilerError, Type};

impl FunctionCompiler<'_> {
    pub(super) fn statement(&mut self, statement: &tst::Statement) -> Result<(), CompilerError> {
        match statement {
            tst::Statement::Assignment { name, expression } => {
                self.expression(expression)?;

                match self.slots.slot(name) {
                    Some(slot) => self.store(expression.type_of(), slot)?,
                    None => {
                        let field = self.field_ref(name, expression.type_of())?;
                        self.builder.emit(Instruction::PutStatic(field));
                    }
                }
            }

            tst::Statement::ConstantDeclaration { name, expression }
            | tst::Statement::VariableDeclaration { name, expression } => {
                self.expression(expression)?;
                let slot = self.slots.new_binding(name)?;
                self.store(expression.type_of(), slot)?;
            }

            tst::Statement::IfThenElse { guard, then, otherwise } => {
                let else_label = self.builder.new_label();
                let end_label = self.builder.new_label();

                self.expression(guard)?;
                self.builder.emit_jump(Some(Condition::Eq), else_label);
                self.branch(then)?;
                self.builder.emit_jump(None, end_label);
                self.place(else_label)?;
                if let Some(otherwise) = otherwise {
                    self.branch(otherwise)?;
                }
                self.place(end_label)?;
            }

            tst::Statement::While { guard, body } => {
                let top_label = self.builder.new_label();
                let end_label = self.builder.new_label();

                self.place(top_label)?;
                self.expression(guard)?;
                self.builder.emit_jump(Some(Condition::Eq), end_label);
                self.branch(body)?;
                self.builder.emit_jump(None, top_label);
                self.place(end_label)?;
            }

            tst::Statement::Block { statements } => {
                self.slots.open_scope();
                for statement in statements {
                    self.statement(statement)?;
                }
                self.slots.close_scope();
            }

            tst::Statement::Call { callee, arguments } => match callee {
                tst::Callee::Print => self.print(arguments)?,
                tst::Callee::Println => {
                    self.print(arguments)?;
                    self.builder.emit(Instruction::GetStdout);
                    self.builder.emit(Instruction::PrintNewline);
                }
                tst::Callee::Function(name) => {
                    for argument in arguments {
                        self.expression(argument)?;
                    }
                    self.invoke(name, arguments, None)?;
                }
            },

            tst::Statement::Empty => {}
        }

        Ok(())
    }

    /// Branches and loop bodies keep their bindings to themselves
    fn branch(&mut self, statement: &tst::Statement) -> Result<(), CompilerError> {
        self.slots.open_scope();
        let result = self.statement(statement);
        self.slots.close_scope();
        result
    }

    /// Per argument: stream, value, typed print
    fn print(&mut self, arguments: &[tst::Expression]) -> Result<(), CompilerError> {
        for argument in arguments {
            self.builder.emit(Instruction::GetStdout);
            self.expression(argument)?;

            let print = match argument.type_of() {
                Type::Float => Instruction::PrintFixed { precision: FLOAT_PRINT_PRECISION },
                other => Instruction::Print(field_type(other)?),
            };
            self.builder.emit(print);
        }
        Ok(())
    }

    pub(super) fn invoke(
        &mut self,
        name: &str,
        arguments: &[tst::Expression],
        result: Option<Type>,
    ) -> Result<(), CompilerError> {
        let argument_types: Vec<Type> = arguments.iter().map(|a| a.type_of()).collect();

        self.builder.emit(Instruction::InvokeStatic(MethodRef {
            owner: self.owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor(&argument_types, result)?,
        }));
        Ok(())
    }

    fn store(&mut self, t: Type, slot: u16) -> Result<(), CompilerError> {
        let instruction = match t {
            Type::Int | Type::Bool => Instruction::IStore(slot),
            Type::Float => Instruction::FStore(slot),
            other => return Err(CompilerError::internal(format!("no local slot store for type {other}"))),
        };
        self.builder.emit(instruction);
        Ok(())
    }

    pub(super) fn field_ref(&self, name: &str, t: Type) -> Result<FieldRef, CompilerError> {
        Ok(FieldRef {
            owner: self.owner.to_string(),
            name: name.to_string(),
            field_type: field_type(t)?,
        })
    }
}
