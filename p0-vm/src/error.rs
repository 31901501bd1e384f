//! VM errors

use p0_bytecode::BytecodeError;
use thiserror::Error;

/// What went wrong inside a running routine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fault {
    #[error("division by zero")]
    DivisionByZero,

    #[error("operand stack underflow")]
    StackUnderflow,

    #[error("expected {expected} on the operand stack, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },

    #[error("local slot {slot} is out of range")]
    BadLocal { slot: u16 },

    #[error("execution ran past the end of the routine")]
    FellOffEnd,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VmError {
    #[error("{routine} @ {pc}: {fault}")]
    Fault { routine: String, pc: usize, fault: Fault },

    #[error("no routine named '{name}'")]
    UnknownRoutine { name: String },

    #[error("no static field named '{name}'")]
    UnknownField { name: String },

    #[error("call depth exceeded {limit}")]
    CallDepthExceeded { limit: usize },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error(transparent)]
    Load(#[from] BytecodeError),
}

impl From<std::io::Error> for VmError {
    fn from(err: std::io::Error) -> Self {
        VmError::Output { message: err.to_string() }
    }
}
