//! Expression lowering
//!
//! Every expression leaves exactly one value on the operand stack. Booleans
//! are the ints 0 and 1. The machine has no compare-to-boolean instruction,
//! so comparisons branch to code that pushes the result.

use super::{bytecode_error, FunctionCompiler};
use crate::tst;
use p0_bytecode::{Condition, Instruction, Label};
use p0_common::{BinaryOp, CompilerError, Type, UnaryOp};

impl FunctionCompiler<'_> {
    pub(super) fn expression(&mut self, expression: &tst::Expression) -> Result<(), CompilerError> {
        match expression {
            tst::Expression::Ternary { guard, then, otherwise } => {
                let else_label = self.builder.new_label();
                let end_label = self.builder.new_label();

                self.expression(guard)?;
                self.builder.emit_jump(Some(Condition::Eq), else_label);
                self.expression(then)?;
                self.builder.emit_jump(None, end_label);
                self.place(else_label)?;
                self.expression(otherwise)?;
                self.place(end_label)?;
            }

            tst::Expression::Binary { op, left, right } => {
                // Both operands are always evaluated, && and || included
                self.expression(left)?;
                self.expression(right)?;
                self.binary(*op, left.type_of())?;
            }

            tst::Expression::Unary { expr_type, op, operand } => {
                self.expression(operand)?;

                match op {
                    UnaryOp::UnaryNot => self.materialize(|b, label| b.emit_jump(Some(Condition::Eq), label))?,
                    UnaryOp::UnaryMinus => match expr_type {
                        Type::Int => self.builder.emit(Instruction::INeg),
                        Type::Float => self.builder.emit(Instruction::FNeg),
                        other => return Err(unsupported("unary -", *other)),
                    },
                    UnaryOp::UnaryPlus => {}
                }
            }

            tst::Expression::Call { expr_type, name, arguments } => {
                for argument in arguments {
                    self.expression(argument)?;
                }
                self.invoke(name, arguments, Some(*expr_type))?;
            }

            tst::Expression::IdentifierReference { expr_type, name } => match self.slots.slot(name) {
                Some(slot) => {
                    let load = match expr_type {
                        Type::Int | Type::Bool => Instruction::ILoad(slot),
                        Type::Float => Instruction::FLoad(slot),
                        other => return Err(unsupported("local load", *other)),
                    };
                    self.builder.emit(load);
                }
                None => {
                    let field = self.field_ref(name, *expr_type)?;
                    self.builder.emit(Instruction::GetStatic(field));
                }
            },

            tst::Expression::Literal { value } => {
                let constant = match value {
                    tst::LiteralValue::Bool(v) => Instruction::IConst(*v as i32),
                    tst::LiteralValue::Int(v) => Instruction::IConst(*v),
                    tst::LiteralValue::Float(v) => Instruction::FConst(*v),
                    tst::LiteralValue::String(v) => Instruction::SConst(v.clone()),
                };
                self.builder.emit(constant);
            }
        }

        Ok(())
    }

    /// Combine the two operands already on the stack
    fn binary(&mut self, op: BinaryOp, operand_type: Type) -> Result<(), CompilerError> {
        match op {
            BinaryOp::And => self.builder.emit(Instruction::IAnd),
            BinaryOp::Or => self.builder.emit(Instruction::IOr),

            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => {
                let instruction = match (operand_type, op) {
                    (Type::Int, BinaryOp::Plus) => Instruction::IAdd,
                    (Type::Int, BinaryOp::Minus) => Instruction::ISub,
                    (Type::Int, BinaryOp::Times) => Instruction::IMul,
                    (Type::Int, BinaryOp::Divide) => Instruction::IDiv,
                    (Type::Float, BinaryOp::Plus) => Instruction::FAdd,
                    (Type::Float, BinaryOp::Minus) => Instruction::FSub,
                    (Type::Float, BinaryOp::Times) => Instruction::FMul,
                    (Type::Float, BinaryOp::Divide) => Instruction::FDiv,
                    (other, _) => return Err(unsupported(&format!("operator {op}"), other)),
                };
                self.builder.emit(instruction);
            }

            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::LessThan
            | BinaryOp::LessEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterEqual => {
                let condition = condition(op);

                match (operand_type, op) {
                    (Type::Int, _) => self.materialize(|b, label| b.emit_icmp_jump(condition, label))?,
                    (Type::Float, _) => {
                        self.builder.emit(Instruction::FCmpG);
                        self.materialize(|b, label| b.emit_jump(Some(condition), label))?;
                    }
                    (Type::Bool, BinaryOp::NotEqual) => self.builder.emit(Instruction::IXor),
                    (Type::Bool, BinaryOp::Equal) => {
                        self.builder.emit(Instruction::IXor);
                        self.builder.emit(Instruction::IConst(1));
                        self.builder.emit(Instruction::IXor);
                    }
                    (other, _) => return Err(unsupported(&format!("operator {op}"), other)),
                }
            }
        }

        Ok(())
    }

    /// `<jump L>; iconst 0; goto E; L: iconst 1; E:`
    fn materialize(
        &mut self,
        jump: impl FnOnce(&mut p0_bytecode::CodeBuilder, Label),
    ) -> Result<(), CompilerError> {
        let true_label = self.builder.new_label();
        let end_label = self.builder.new_label();

        jump(&mut self.builder, true_label);
        self.builder.emit(Instruction::IConst(0));
        self.builder.emit_jump(None, end_label);
        self.place(true_label)?;
        self.builder.emit(Instruction::IConst(1));
        self.place(end_label)
    }

    pub(super) fn place(&mut self, label: Label) -> Result<(), CompilerError> {
        self.builder.place_label(label).map_err(bytecode_error)
    }
}

fn condition(op: BinaryOp) -> Condition {
    match op {
        BinaryOp::NotEqual => Condition::Ne,
        BinaryOp::LessThan => Condition::Lt,
        BinaryOp::LessEqual => Condition::Le,
        BinaryOp::GreaterThan => Condition::Gt,
        BinaryOp::GreaterEqual => Condition::Ge,
        _ => Condition::Eq,
    }
}

fn unsupported(what: &str, t: Type) -> CompilerError {
    CompilerError::internal(format!("{what} has no lowering for type {t}"))
}
