//! p0 Compiler - Stack Machine Bytecode
//!
//! The target of the p0 code generator: an abstract typed stack machine.
//!
//! ## Architecture
//!
//! - `types` - storage types and method descriptors
//! - `instruction` - the instruction set
//! - `builder` - routine construction with symbolic labels
//! - `module` - fields, routines and the text listing
//! - `codec` - the binary module format

pub use self::builder::{CodeBuilder, Label};
pub use self::errors::BytecodeError;
pub use self::instruction::{Condition, FieldRef, Instruction, MethodRef, Opcode};
pub use self::module::{Constant, Field, Function, Module};
pub use self::types::{FieldType, MethodDescriptor};

pub mod codec;

mod builder;
mod errors;
mod instruction;
mod module;
mod types;
