//! p0 Compiler - Stack Machine Interpreter
//!
//! Executes the modules produced by the p0 code generator. Each routine
//! activation has its own locals and operand stack; calls are kept on an
//! explicit frame stack.

pub mod constants;
pub mod error;
pub mod value;
pub mod vm;

pub use error::{Fault, VmError};
pub use value::Value;
pub use vm::{VMState, VmOptions, VM};

use p0_bytecode::Module;

/// Run a module to completion and return everything it printed
pub fn run_to_string(module: Module) -> Result<String, VmError> {
    let mut output = Vec::new();
    VM::new(module).run(&mut output)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
