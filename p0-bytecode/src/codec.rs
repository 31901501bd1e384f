//! Binary module format
//!
//! ```text
//! "P0MOD" version:u16 name:str
//! field_count:u32   { name:str flags:u8 type:u8 constant }*
//! function_count:u32 { name:str descriptor:str max_locals:u16 code_len:u32 instruction* }*
//! ```
//!
//! All integers are little-endian, strings are a `u32` byte length followed by
//! UTF-8, floats are their IEEE bit pattern. Each instruction is its opcode
//! byte followed by its operands.

use crate::errors::BytecodeError;
use crate::instruction::{Condition, FieldRef, Instruction, MethodRef, Opcode};
use crate::module::{Constant, Field, Function, Module};
use crate::types::{FieldType, MethodDescriptor};
use log::debug;

pub const MAGIC: &[u8] = b"P0MOD";
pub const VERSION: u16 = 1;

const FLAG_FINAL: u8 = 0x01;

impl Module {
    pub fn to_binary(&self) -> Vec<u8> {
        let mut binary = Vec::new();

        binary.extend_from_slice(MAGIC);
        binary.extend_from_slice(&VERSION.to_le_bytes());
        write_str(&mut binary, &self.name);

        binary.extend_from_slice(&(self.fields.len() as u32).to_le_bytes());
        for field in &self.fields {
            write_str(&mut binary, &field.name);
            binary.push(if field.is_final { FLAG_FINAL } else { 0 });
            binary.push(field.field_type.descriptor() as u8);
            write_constant(&mut binary, &field.initial);
        }

        binary.extend_from_slice(&(self.functions.len() as u32).to_le_bytes());
        for function in &self.functions {
            write_str(&mut binary, &function.name);
            write_str(&mut binary, &function.descriptor.to_string());
            binary.extend_from_slice(&function.max_locals.to_le_bytes());
            binary.extend_from_slice(&(function.code.len() as u32).to_le_bytes());
            for instruction in &function.code {
                write_instruction(&mut binary, instruction);
            }
        }

        binary
    }

    pub fn from_binary(binary: &[u8]) -> Result<Module, BytecodeError> {
        if binary.len() < MAGIC.len() || &binary[..MAGIC.len()] != MAGIC {
            return Err(BytecodeError::BadMagic);
        }

        let mut reader = Reader { bytes: binary, pos: MAGIC.len() };

        let version = reader.u16()?;
        if version != VERSION {
            return Err(BytecodeError::UnsupportedVersion { version });
        }

        let mut module = Module::new(reader.string()?);

        let field_count = reader.u32()?;
        for _ in 0..field_count {
            let name = reader.string()?;
            let is_final = reader.u8()? & FLAG_FINAL != 0;
            let field_type = reader.field_type()?;
            let initial = reader.constant()?;
            module.add_field(Field { name, is_final, field_type, initial });
        }

        let function_count = reader.u32()?;
        for _ in 0..function_count {
            let name = reader.string()?;
            let descriptor: MethodDescriptor = reader.string()?.parse()?;
            let max_locals = reader.u16()?;
            let code_len = reader.u32()?;
            let code = (0..code_len)
                .map(|_| reader.instruction())
                .collect::<Result<Vec<_>, _>>()?;
            module.add_function(Function { name, descriptor, max_locals, code });
        }

        if reader.pos != binary.len() {
            return Err(BytecodeError::TrailingBytes { count: binary.len() - reader.pos });
        }

        debug!(
            "loaded module '{}': {} field(s), {} function(s)",
            module.name,
            module.fields.len(),
            module.functions.len()
        );
        Ok(module)
    }
}

fn write_str(binary: &mut Vec<u8>, s: &str) {
    binary.extend_from_slice(&(s.len() as u32).to_le_bytes());
    binary.extend_from_slice(s.as_bytes());
}

fn write_constant(binary: &mut Vec<u8>, constant: &Constant) {
    binary.push(constant.field_type().descriptor() as u8);
    match constant {
        Constant::Int(v) => binary.extend_from_slice(&v.to_le_bytes()),
        Constant::Float(v) => binary.extend_from_slice(&v.to_bits().to_le_bytes()),
        Constant::Bool(v) => binary.push(*v as u8),
        Constant::String(v) => write_str(binary, v),
    }
}

fn write_field_ref(binary: &mut Vec<u8>, field: &FieldRef) {
    write_str(binary, &field.owner);
    write_str(binary, &field.name);
    binary.push(field.field_type.descriptor() as u8);
}

fn write_instruction(binary: &mut Vec<u8>, instruction: &Instruction) {
    binary.push(instruction.opcode() as u8);

    match instruction {
        Instruction::IConst(v) => binary.extend_from_slice(&v.to_le_bytes()),
        Instruction::FConst(v) => binary.extend_from_slice(&v.to_bits().to_le_bytes()),
        Instruction::SConst(s) => write_str(binary, s),
        Instruction::ILoad(slot)
        | Instruction::FLoad(slot)
        | Instruction::IStore(slot)
        | Instruction::FStore(slot) => binary.extend_from_slice(&slot.to_le_bytes()),
        Instruction::GetStatic(field) | Instruction::PutStatic(field) => write_field_ref(binary, field),
        Instruction::If(cond, target) | Instruction::IfICmp(cond, target) => {
            binary.push(*cond as u8);
            binary.extend_from_slice(&target.to_le_bytes());
        }
        Instruction::Goto(target) => binary.extend_from_slice(&target.to_le_bytes()),
        Instruction::InvokeStatic(method) => {
            write_str(binary, &method.owner);
            write_str(binary, &method.name);
            write_str(binary, &method.descriptor.to_string());
        }
        Instruction::Print(field_type) => binary.push(field_type.descriptor() as u8),
        Instruction::PrintFixed { precision } => binary.push(*precision),
        _ => {}
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], BytecodeError> {
        let end = self.pos.checked_add(n).filter(|end| *end <= self.bytes.len());
        let end = end.ok_or(BytecodeError::UnexpectedEof { offset: self.pos })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BytecodeError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn u8(&mut self) -> Result<u8, BytecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, BytecodeError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, BytecodeError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i32(&mut self) -> Result<i32, BytecodeError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn f32(&mut self) -> Result<f32, BytecodeError> {
        Ok(f32::from_bits(self.u32()?))
    }

    fn string(&mut self) -> Result<String, BytecodeError> {
        let len = self.u32()? as usize;
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| BytecodeError::InvalidUtf8 { offset })
    }

    fn field_type(&mut self) -> Result<FieldType, BytecodeError> {
        let offset = self.pos;
        let tag = self.u8()?;
        FieldType::from_descriptor(tag as char).ok_or(BytecodeError::InvalidTag {
            what: "field type",
            tag,
            offset,
        })
    }

    fn condition(&mut self) -> Result<Condition, BytecodeError> {
        let offset = self.pos;
        let tag = self.u8()?;
        Condition::from_u8(tag).ok_or(BytecodeError::InvalidTag { what: "condition", tag, offset })
    }

    fn constant(&mut self) -> Result<Constant, BytecodeError> {
        let constant = match self.field_type()? {
            FieldType::Int => Constant::Int(self.i32()?),
            FieldType::Float => Constant::Float(self.f32()?),
            FieldType::Bool => Constant::Bool(self.u8()? != 0),
            FieldType::String => Constant::String(self.string()?),
        };
        Ok(constant)
    }

    fn field_ref(&mut self) -> Result<FieldRef, BytecodeError> {
        Ok(FieldRef {
            owner: self.string()?,
            name: self.string()?,
            field_type: self.field_type()?,
        })
    }

    fn instruction(&mut self) -> Result<Instruction, BytecodeError> {
        let offset = self.pos;
        let byte = self.u8()?;
        let opcode = Opcode::try_from(byte)
            .map_err(|opcode| BytecodeError::UnknownOpcode { opcode, offset })?;

        let instruction = match opcode {
            Opcode::IConst => Instruction::IConst(self.i32()?),
            Opcode::FConst => Instruction::FConst(self.f32()?),
            Opcode::SConst => Instruction::SConst(self.string()?),
            Opcode::ILoad => Instruction::ILoad(self.u16()?),
            Opcode::FLoad => Instruction::FLoad(self.u16()?),
            Opcode::IStore => Instruction::IStore(self.u16()?),
            Opcode::FStore => Instruction::FStore(self.u16()?),
            Opcode::GetStatic => Instruction::GetStatic(self.field_ref()?),
            Opcode::PutStatic => Instruction::PutStatic(self.field_ref()?),
            Opcode::IAdd => Instruction::IAdd,
            Opcode::ISub => Instruction::ISub,
            Opcode::IMul => Instruction::IMul,
            Opcode::IDiv => Instruction::IDiv,
            Opcode::INeg => Instruction::INeg,
            Opcode::FAdd => Instruction::FAdd,
            Opcode::FSub => Instruction::FSub,
            Opcode::FMul => Instruction::FMul,
            Opcode::FDiv => Instruction::FDiv,
            Opcode::FNeg => Instruction::FNeg,
            Opcode::IAnd => Instruction::IAnd,
            Opcode::IOr => Instruction::IOr,
            Opcode::IXor => Instruction::IXor,
            Opcode::FCmpG => Instruction::FCmpG,
            Opcode::If => {
                let cond = self.condition()?;
                Instruction::If(cond, self.u32()?)
            }
            Opcode::IfICmp => {
                let cond = self.condition()?;
                Instruction::IfICmp(cond, self.u32()?)
            }
            Opcode::Goto => Instruction::Goto(self.u32()?),
            Opcode::InvokeStatic => Instruction::InvokeStatic(MethodRef {
                owner: self.string()?,
                name: self.string()?,
                descriptor: self.string()?.parse()?,
            }),
            Opcode::Return => Instruction::Return,
            Opcode::IReturn => Instruction::IReturn,
            Opcode::FReturn => Instruction::FReturn,
            Opcode::GetStdout => Instruction::GetStdout,
            Opcode::Print => Instruction::Print(self.field_type()?),
            Opcode::PrintFixed => Instruction::PrintFixed { precision: self.u8()? },
            Opcode::PrintNewline => Instruction::PrintNewline,
            Opcode::Pop => Instruction::Pop,
        };

        Ok(instruction)
    }
}
