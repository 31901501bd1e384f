use crate::error::{Fault, VmError};
use crate::value::Value;
use p0_bytecode::{Function, Instruction};

/// VM execution states
#[derive(Debug, Clone, PartialEq)]
pub enum VMState {
    Setup,
    Running,
    Halted,
    Error(String),
}

/// One routine activation: its locals and its operand stack
#[derive(Debug)]
pub(super) struct Frame {
    pub routine: usize,
    name: String,
    pc: usize,
    current: usize,
    locals: Vec<Value>,
    stack: Vec<Value>,
}

impl Frame {
    /// Arguments fill the first slots, the rest start out as `Unit`
    pub fn new(routine: usize, function: &Function, mut arguments: Vec<Value>) -> Self {
        let size = (function.max_locals as usize).max(arguments.len());
        arguments.resize(size, Value::Unit);

        Self {
            routine,
            name: function.name.clone(),
            pc: 0,
            current: 0,
            locals: arguments,
            stack: Vec::new(),
        }
    }

    pub fn fetch(&mut self, function: &Function) -> Result<Instruction, VmError> {
        let instruction = function.code.get(self.pc).cloned().ok_or_else(|| self.fault(Fault::FellOffEnd))?;
        self.current = self.pc;
        self.pc += 1;
        Ok(instruction)
    }

    pub fn jump(&mut self, target: u32) {
        self.pc = target as usize;
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, VmError> {
        self.stack.pop().ok_or_else(|| self.fault(Fault::StackUnderflow))
    }

    pub fn pop_int(&mut self) -> Result<i32, VmError> {
        match self.pop()? {
            Value::Int(v) => Ok(v),
            other => Err(self.mismatch("int", &other)),
        }
    }

    pub fn pop_float(&mut self) -> Result<f32, VmError> {
        match self.pop()? {
            Value::Float(v) => Ok(v),
            other => Err(self.mismatch("float", &other)),
        }
    }

    pub fn pop_stream(&mut self) -> Result<(), VmError> {
        match self.pop()? {
            Value::Stream => Ok(()),
            other => Err(self.mismatch("stream", &other)),
        }
    }

    /// The top `count` values in push order
    pub fn pop_many(&mut self, count: usize) -> Result<Vec<Value>, VmError> {
        if self.stack.len() < count {
            return Err(self.fault(Fault::StackUnderflow));
        }
        Ok(self.stack.split_off(self.stack.len() - count))
    }

    pub fn load(&self, slot: u16) -> Result<Value, VmError> {
        self.locals
            .get(slot as usize)
            .cloned()
            .ok_or_else(|| self.fault(Fault::BadLocal { slot }))
    }

    pub fn store(&mut self, slot: u16, value: Value) -> Result<(), VmError> {
        match self.locals.get_mut(slot as usize) {
            Some(local) => {
                *local = value;
                Ok(())
            }
            None => Err(self.fault(Fault::BadLocal { slot })),
        }
    }

    pub fn mismatch(&self, expected: &'static str, found: &Value) -> VmError {
        self.fault(Fault::TypeMismatch { expected, found: found.type_name() })
    }

    pub fn fault(&self, fault: Fault) -> VmError {
        VmError::Fault { routine: self.name.clone(), pc: self.current, fault }
    }
}
