use super::state::Frame;
use super::VM;
use crate::constants::{FALSE_TEXT, INFINITY_TEXT, NAN_TEXT, TRUE_TEXT};
use crate::error::{Fault, VmError};
use crate::value::Value;
use p0_bytecode::{FieldRef, FieldType, Instruction, MethodRef};
use std::cmp::Ordering;
use std::io::Write;

/// What the interpreter loop does after one instruction
pub(super) enum Flow {
    Next,
    Call { routine: usize, arguments: Vec<Value> },
    Return(Option<Value>),
}

impl VM {
    pub(super) fn execute_instruction<W: Write>(
        &mut self,
        frame: &mut Frame,
        instruction: Instruction,
        out: &mut W,
    ) -> Result<Flow, VmError> {
        match instruction {
            Instruction::IConst(v) => frame.push(Value::Int(v)),
            Instruction::FConst(v) => frame.push(Value::Float(v)),
            Instruction::SConst(v) => frame.push(Value::Str(v)),

            Instruction::ILoad(slot) => {
                let value = frame.load(slot)?;
                if value.as_int().is_none() {
                    return Err(frame.mismatch("int", &value));
                }
                frame.push(value);
            }
            Instruction::FLoad(slot) => {
                let value = frame.load(slot)?;
                if value.as_float().is_none() {
                    return Err(frame.mismatch("float", &value));
                }
                frame.push(value);
            }
            Instruction::IStore(slot) => {
                let v = frame.pop_int()?;
                frame.store(slot, Value::Int(v))?;
            }
            Instruction::FStore(slot) => {
                let v = frame.pop_float()?;
                frame.store(slot, Value::Float(v))?;
            }

            Instruction::GetStatic(field) => {
                let value = self.static_value(&field)?.clone();
                frame.push(value);
            }
            Instruction::PutStatic(field) => {
                let value = frame.pop()?;
                *self.static_value(&field)? = value;
            }

            // Int arithmetic wraps like the 32-bit machine it models
            Instruction::IAdd => int_binary(frame, |a, b| Ok(a.wrapping_add(b)))?,
            Instruction::ISub => int_binary(frame, |a, b| Ok(a.wrapping_sub(b)))?,
            Instruction::IMul => int_binary(frame, |a, b| Ok(a.wrapping_mul(b)))?,
            Instruction::IDiv => int_binary(frame, |a, b| match b {
                0 => Err(Fault::DivisionByZero),
                _ => Ok(a.wrapping_div(b)),
            })?,
            Instruction::INeg => {
                let v = frame.pop_int()?;
                frame.push(Value::Int(v.wrapping_neg()));
            }
            Instruction::IAnd => int_binary(frame, |a, b| Ok(a & b))?,
            Instruction::IOr => int_binary(frame, |a, b| Ok(a | b))?,
            Instruction::IXor => int_binary(frame, |a, b| Ok(a ^ b))?,

            Instruction::FAdd => float_binary(frame, |a, b| a + b)?,
            Instruction::FSub => float_binary(frame, |a, b| a - b)?,
            Instruction::FMul => float_binary(frame, |a, b| a * b)?,
            Instruction::FDiv => float_binary(frame, |a, b| a / b)?,
            Instruction::FNeg => {
                let v = frame.pop_float()?;
                frame.push(Value::Float(-v));
            }

            // NaN compares as greater
            Instruction::FCmpG => {
                let b = frame.pop_float()?;
                let a = frame.pop_float()?;
                let result = match a.partial_cmp(&b) {
                    Some(Ordering::Less) => -1,
                    Some(Ordering::Equal) => 0,
                    Some(Ordering::Greater) | None => 1,
                };
                frame.push(Value::Int(result));
            }

            Instruction::If(condition, target) => {
                let v = frame.pop_int()?;
                if condition.holds(v.cmp(&0)) {
                    frame.jump(target);
                }
            }
            Instruction::IfICmp(condition, target) => {
                let b = frame.pop_int()?;
                let a = frame.pop_int()?;
                if condition.holds(a.cmp(&b)) {
                    frame.jump(target);
                }
            }
            Instruction::Goto(target) => frame.jump(target),

            Instruction::InvokeStatic(method) => {
                let routine = self.method_index(&method)?;
                let arguments = frame.pop_many(method.descriptor.parameters.len())?;
                return Ok(Flow::Call { routine, arguments });
            }
            Instruction::Return => return Ok(Flow::Return(None)),
            Instruction::IReturn => return Ok(Flow::Return(Some(Value::Int(frame.pop_int()?)))),
            Instruction::FReturn => return Ok(Flow::Return(Some(Value::Float(frame.pop_float()?)))),

            Instruction::GetStdout => frame.push(Value::Stream),
            Instruction::Print(field_type) => {
                let value = frame.pop()?;
                frame.pop_stream()?;
                let text = print_text(frame, field_type, value)?;
                write!(out, "{text}")?;
            }
            Instruction::PrintFixed { precision } => {
                let v = frame.pop_float()?;
                frame.pop_stream()?;
                write!(out, "{}", float_text(v, Some(precision as usize)))?;
            }
            Instruction::PrintNewline => {
                frame.pop_stream()?;
                writeln!(out)?;
            }

            Instruction::Pop => {
                frame.pop()?;
            }
        }

        Ok(Flow::Next)
    }

    fn static_value(&mut self, field: &FieldRef) -> Result<&mut Value, VmError> {
        let unknown = || VmError::UnknownField { name: format!("{}.{}", field.owner, field.name) };

        if field.owner != self.module.name {
            return Err(unknown());
        }
        self.statics.get_mut(&field.name).ok_or_else(unknown)
    }

    fn method_index(&self, method: &MethodRef) -> Result<usize, VmError> {
        let unknown = || VmError::UnknownRoutine { name: format!("{}.{}", method.owner, method.name) };

        if method.owner != self.module.name {
            return Err(unknown());
        }
        self.routines.get(&method.name).copied().ok_or_else(unknown)
    }
}

fn int_binary(frame: &mut Frame, op: impl FnOnce(i32, i32) -> Result<i32, Fault>) -> Result<(), VmError> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    let result = op(a, b).map_err(|fault| frame.fault(fault))?;
    frame.push(Value::Int(result));
    Ok(())
}

fn float_binary(frame: &mut Frame, op: impl FnOnce(f32, f32) -> f32) -> Result<(), VmError> {
    let b = frame.pop_float()?;
    let a = frame.pop_float()?;
    frame.push(Value::Float(op(a, b)));
    Ok(())
}

fn print_text(frame: &Frame, field_type: FieldType, value: Value) -> Result<String, VmError> {
    match (field_type, value) {
        (FieldType::Int, Value::Int(v)) => Ok(v.to_string()),
        (FieldType::Bool, Value::Int(v)) => Ok(if v != 0 { TRUE_TEXT } else { FALSE_TEXT }.to_string()),
        (FieldType::Float, Value::Float(v)) => Ok(float_text(v, None)),
        (FieldType::String, Value::Str(s)) => Ok(s),
        (FieldType::Int | FieldType::Bool, other) => Err(frame.mismatch("int", &other)),
        (FieldType::Float, other) => Err(frame.mismatch("float", &other)),
        (FieldType::String, other) => Err(frame.mismatch("string", &other)),
    }
}

/// Non-finite values print as `Infinity`, `-Infinity` and `NaN`
fn float_text(v: f32, precision: Option<usize>) -> String {
    if v.is_nan() {
        NAN_TEXT.to_string()
    } else if v.is_infinite() {
        let sign = if v < 0.0 { "-" } else { "" };
        format!("{sign}{INFINITY_TEXT}")
    } else {
        match precision {
            Some(precision) => format!("{:.*}", precision, v),
            None => v.to_string(),
        }
    }
}
