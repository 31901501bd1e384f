//! Stack machine instruction set
//!
//! The machine has an operand stack, numbered local slots per activation,
//! static fields owned by a module, and an output stream. Booleans travel as
//! the ints 0 and 1. Jump targets are instruction indices within the routine.

use crate::types::{FieldType, MethodDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Branch condition, comparing against zero (`If`) or two ints (`IfICmp`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Condition {
    Eq = 0,
    Ne = 1,
    Lt = 2,
    Le = 3,
    Gt = 4,
    Ge = 5,
}

impl Condition {
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Condition::Eq => ordering == Equal,
            Condition::Ne => ordering != Equal,
            Condition::Lt => ordering == Less,
            Condition::Le => ordering != Greater,
            Condition::Gt => ordering == Greater,
            Condition::Ge => ordering != Less,
        }
    }

    pub fn from_u8(tag: u8) -> Option<Condition> {
        match tag {
            0 => Some(Condition::Eq),
            1 => Some(Condition::Ne),
            2 => Some(Condition::Lt),
            3 => Some(Condition::Le),
            4 => Some(Condition::Gt),
            5 => Some(Condition::Ge),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Eq => "eq",
            Condition::Ne => "ne",
            Condition::Lt => "lt",
            Condition::Le => "le",
            Condition::Gt => "gt",
            Condition::Ge => "ge",
        };
        write!(f, "{name}")
    }
}

/// Opcode byte of each instruction in the binary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    IConst = 0x01,
    FConst = 0x02,
    SConst = 0x03,

    ILoad = 0x10,
    FLoad = 0x11,
    IStore = 0x12,
    FStore = 0x13,
    GetStatic = 0x14,
    PutStatic = 0x15,

    IAdd = 0x20,
    ISub = 0x21,
    IMul = 0x22,
    IDiv = 0x23,
    INeg = 0x24,
    FAdd = 0x25,
    FSub = 0x26,
    FMul = 0x27,
    FDiv = 0x28,
    FNeg = 0x29,
    IAnd = 0x2A,
    IOr = 0x2B,
    IXor = 0x2C,
    FCmpG = 0x2D,

    If = 0x30,
    IfICmp = 0x31,
    Goto = 0x32,

    InvokeStatic = 0x40,
    Return = 0x41,
    IReturn = 0x42,
    FReturn = 0x43,

    GetStdout = 0x50,
    Print = 0x51,
    PrintFixed = 0x52,
    PrintNewline = 0x53,
    Pop = 0x54,
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        let opcode = match byte {
            0x01 => Opcode::IConst,
            0x02 => Opcode::FConst,
            0x03 => Opcode::SConst,
            0x10 => Opcode::ILoad,
            0x11 => Opcode::FLoad,
            0x12 => Opcode::IStore,
            0x13 => Opcode::FStore,
            0x14 => Opcode::GetStatic,
            0x15 => Opcode::PutStatic,
            0x20 => Opcode::IAdd,
            0x21 => Opcode::ISub,
            0x22 => Opcode::IMul,
            0x23 => Opcode::IDiv,
            0x24 => Opcode::INeg,
            0x25 => Opcode::FAdd,
            0x26 => Opcode::FSub,
            0x27 => Opcode::FMul,
            0x28 => Opcode::FDiv,
            0x29 => Opcode::FNeg,
            0x2A => Opcode::IAnd,
            0x2B => Opcode::IOr,
            0x2C => Opcode::IXor,
            0x2D => Opcode::FCmpG,
            0x30 => Opcode::If,
            0x31 => Opcode::IfICmp,
            0x32 => Opcode::Goto,
            0x40 => Opcode::InvokeStatic,
            0x41 => Opcode::Return,
            0x42 => Opcode::IReturn,
            0x43 => Opcode::FReturn,
            0x50 => Opcode::GetStdout,
            0x51 => Opcode::Print,
            0x52 => Opcode::PrintFixed,
            0x53 => Opcode::PrintNewline,
            0x54 => Opcode::Pop,
            other => return Err(other),
        };
        Ok(opcode)
    }
}

/// A static field reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub owner: String,
    pub name: String,
    pub field_type: FieldType,
}

/// A static routine reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub owner: String,
    pub name: String,
    pub descriptor: MethodDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    // Constants
    IConst(i32),
    FConst(f32),
    SConst(String),

    // Locals and statics
    ILoad(u16),
    FLoad(u16),
    IStore(u16),
    FStore(u16),
    GetStatic(FieldRef),
    PutStatic(FieldRef),

    // Arithmetic, ints wrap
    IAdd,
    ISub,
    IMul,
    IDiv,
    INeg,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FNeg,

    // Bitwise
    IAnd,
    IOr,
    IXor,

    /// Pushes -1, 0 or 1; NaN compares as 1
    FCmpG,

    // Control flow
    /// Pops an int, jumps when it compares to zero as the condition says
    If(Condition, u32),
    /// Pops two ints `a b`, jumps when `a <cond> b`
    IfICmp(Condition, u32),
    Goto(u32),

    // Calls
    InvokeStatic(MethodRef),
    Return,
    IReturn,
    FReturn,

    // Output stream
    GetStdout,
    /// Pops a value and the stream, prints the value
    Print(FieldType),
    /// Pops a float and the stream, prints it with a fixed number of decimals
    PrintFixed { precision: u8 },
    /// Pops the stream, prints a newline
    PrintNewline,

    Pop,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::IConst(_) => Opcode::IConst,
            Instruction::FConst(_) => Opcode::FConst,
            Instruction::SConst(_) => Opcode::SConst,
            Instruction::ILoad(_) => Opcode::ILoad,
            Instruction::FLoad(_) => Opcode::FLoad,
            Instruction::IStore(_) => Opcode::IStore,
            Instruction::FStore(_) => Opcode::FStore,
            Instruction::GetStatic(_) => Opcode::GetStatic,
            Instruction::PutStatic(_) => Opcode::PutStatic,
            Instruction::IAdd => Opcode::IAdd,
            Instruction::ISub => Opcode::ISub,
            Instruction::IMul => Opcode::IMul,
            Instruction::IDiv => Opcode::IDiv,
            Instruction::INeg => Opcode::INeg,
            Instruction::FAdd => Opcode::FAdd,
            Instruction::FSub => Opcode::FSub,
            Instruction::FMul => Opcode::FMul,
            Instruction::FDiv => Opcode::FDiv,
            Instruction::FNeg => Opcode::FNeg,
            Instruction::IAnd => Opcode::IAnd,
            Instruction::IOr => Opcode::IOr,
            Instruction::IXor => Opcode::IXor,
            Instruction::FCmpG => Opcode::FCmpG,
            Instruction::If(..) => Opcode::If,
            Instruction::IfICmp(..) => Opcode::IfICmp,
            Instruction::Goto(_) => Opcode::Goto,
            Instruction::InvokeStatic(_) => Opcode::InvokeStatic,
            Instruction::Return => Opcode::Return,
            Instruction::IReturn => Opcode::IReturn,
            Instruction::FReturn => Opcode::FReturn,
            Instruction::GetStdout => Opcode::GetStdout,
            Instruction::Print(_) => Opcode::Print,
            Instruction::PrintFixed { .. } => Opcode::PrintFixed,
            Instruction::PrintNewline => Opcode::PrintNewline,
            Instruction::Pop => Opcode::Pop,
        }
    }

    /// Jump target, if this is a branch
    pub fn target(&self) -> Option<u32> {
        match self {
            Instruction::If(_, target) | Instruction::IfICmp(_, target) | Instruction::Goto(target) => {
                Some(*target)
            }
            _ => None,
        }
    }

    pub(crate) fn set_target(&mut self, new_target: u32) {
        if let Instruction::If(_, target) | Instruction::IfICmp(_, target) | Instruction::Goto(target) = self {
            *target = new_target;
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::IConst(v) => write!(f, "iconst {v}"),
            Instruction::FConst(v) => write!(f, "fconst {v:?}"),
            Instruction::SConst(s) => write!(f, "sconst {s:?}"),
            Instruction::ILoad(slot) => write!(f, "iload {slot}"),
            Instruction::FLoad(slot) => write!(f, "fload {slot}"),
            Instruction::IStore(slot) => write!(f, "istore {slot}"),
            Instruction::FStore(slot) => write!(f, "fstore {slot}"),
            Instruction::GetStatic(r) => write!(f, "getstatic {}.{} {}", r.owner, r.name, r.field_type),
            Instruction::PutStatic(r) => write!(f, "putstatic {}.{} {}", r.owner, r.name, r.field_type),
            Instruction::IAdd => write!(f, "iadd"),
            Instruction::ISub => write!(f, "isub"),
            Instruction::IMul => write!(f, "imul"),
            Instruction::IDiv => write!(f, "idiv"),
            Instruction::INeg => write!(f, "ineg"),
            Instruction::FAdd => write!(f, "fadd"),
            Instruction::FSub => write!(f, "fsub"),
            Instruction::FMul => write!(f, "fmul"),
            Instruction::FDiv => write!(f, "fdiv"),
            Instruction::FNeg => write!(f, "fneg"),
            Instruction::IAnd => write!(f, "iand"),
            Instruction::IOr => write!(f, "ior"),
            Instruction::IXor => write!(f, "ixor"),
            Instruction::FCmpG => write!(f, "fcmpg"),
            Instruction::If(cond, target) => write!(f, "if{cond} {target}"),
            Instruction::IfICmp(cond, target) => write!(f, "if_icmp{cond} {target}"),
            Instruction::Goto(target) => write!(f, "goto {target}"),
            Instruction::InvokeStatic(m) => write!(f, "invokestatic {}.{} {}", m.owner, m.name, m.descriptor),
            Instruction::Return => write!(f, "return"),
            Instruction::IReturn => write!(f, "ireturn"),
            Instruction::FReturn => write!(f, "freturn"),
            Instruction::GetStdout => write!(f, "getstdout"),
            Instruction::Print(t) => write!(f, "print {t}"),
            Instruction::PrintFixed { precision } => write!(f, "printfixed {precision}"),
            Instruction::PrintNewline => write!(f, "printnewline"),
            Instruction::Pop => write!(f, "pop"),
        }
    }
}
