/// VM module - interpreter for p0 bytecode modules

mod execution;
mod state;

pub use state::VMState;

use crate::constants::*;
use crate::error::VmError;
use crate::value::Value;
use execution::Flow;
use log::{debug, trace};
use p0_bytecode::Module;
use state::Frame;
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmOptions {
    /// Deepest nesting of active routines before the run is aborted
    pub max_call_depth: usize,
    /// Abort after this many executed instructions
    pub step_limit: Option<u64>,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH, step_limit: None }
    }
}

/// The p0 Virtual Machine
pub struct VM {
    module: Module,

    // Routine index by name
    routines: HashMap<String, usize>,

    // Static field values by name
    statics: HashMap<String, Value>,

    options: VmOptions,

    // VM state
    pub state: VMState,

    // Instructions executed so far
    steps: u64,
}

impl VM {
    pub fn new(module: Module) -> Self {
        Self::with_options(module, VmOptions::default())
    }

    pub fn with_options(module: Module, options: VmOptions) -> Self {
        let routines = module
            .functions
            .iter()
            .enumerate()
            .map(|(index, function)| (function.name.clone(), index))
            .collect();
        let statics = module
            .fields
            .iter()
            .map(|field| (field.name.clone(), Value::from(&field.initial)))
            .collect();

        VM {
            module,
            routines,
            statics,
            options,
            state: VMState::Setup,
            steps: 0,
        }
    }

    /// Load a module in its binary form
    pub fn load_binary(binary: &[u8], options: VmOptions) -> Result<Self, VmError> {
        let module = Module::from_binary(binary)?;
        Ok(Self::with_options(module, options))
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn get_static(&self, name: &str) -> Option<&Value> {
        self.statics.get(name)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run the initializer, if any, then the entry routine
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<(), VmError> {
        debug!("running module '{}'", self.module.name);
        self.state = VMState::Running;

        let result = self.run_entry(out);
        out.flush()?;

        self.state = match &result {
            Ok(()) => VMState::Halted,
            Err(e) => VMState::Error(e.to_string()),
        };
        debug!("module '{}' finished after {} step(s): {:?}", self.module.name, self.steps, self.state);
        result
    }

    fn run_entry<W: Write>(&mut self, out: &mut W) -> Result<(), VmError> {
        if let Some(&init) = self.routines.get(INITIALIZER) {
            self.execute(init, Vec::new(), out)?;
        }

        let main = self.routine_index(ENTRY_ROUTINE)?;
        // Slot 0 of the entry routine is its unused argument
        self.execute(main, vec![Value::Unit], out)?;
        Ok(())
    }

    /// Call a single routine with the given arguments and return its result
    pub fn call<W: Write>(&mut self, name: &str, arguments: Vec<Value>, out: &mut W) -> Result<Option<Value>, VmError> {
        let index = self.routine_index(name)?;
        self.execute(index, arguments, out)
    }

    fn routine_index(&self, name: &str) -> Result<usize, VmError> {
        self.routines
            .get(name)
            .copied()
            .ok_or_else(|| VmError::UnknownRoutine { name: name.to_string() })
    }

    /// Interpret from `routine` until it returns. Calls push the caller on an
    /// explicit stack, so deep p0 recursion never recurses in Rust.
    fn execute<W: Write>(&mut self, routine: usize, arguments: Vec<Value>, out: &mut W) -> Result<Option<Value>, VmError> {
        let mut frame = Frame::new(routine, &self.module.functions[routine], arguments);
        let mut callers: Vec<Frame> = Vec::new();

        loop {
            self.count_step()?;
            let instruction = frame.fetch(&self.module.functions[frame.routine])?;

            match self.execute_instruction(&mut frame, instruction, out)? {
                Flow::Next => {}

                Flow::Call { routine, arguments } => {
                    if callers.len() + 1 >= self.options.max_call_depth {
                        return Err(VmError::CallDepthExceeded { limit: self.options.max_call_depth });
                    }
                    let function = &self.module.functions[routine];
                    trace!("call {} {} at depth {}", function.name, function.descriptor, callers.len() + 1);

                    let callee = Frame::new(routine, function, arguments);
                    callers.push(std::mem::replace(&mut frame, callee));
                }

                Flow::Return(value) => match callers.pop() {
                    Some(caller) => {
                        frame = caller;
                        if let Some(value) = value {
                            frame.push(value);
                        }
                    }
                    None => return Ok(value),
                },
            }
        }
    }

    fn count_step(&mut self) -> Result<(), VmError> {
        self.steps += 1;
        match self.options.step_limit {
            Some(limit) if self.steps > limit => Err(VmError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}
