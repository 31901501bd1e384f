//! Code builder
//!
//! Emits the instruction stream of one routine. Jumps name symbolic labels
//! that may be placed later; `finish` patches every jump with the index of
//! the instruction its label was placed before.

use crate::errors::BytecodeError;
use crate::instruction::{Condition, Instruction};
use log::trace;

/// A symbolic jump target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(u32);

impl Label {
    pub fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct CodeBuilder {
    code: Vec<Instruction>,
    labels: Vec<Option<u32>>,
    fixups: Vec<(usize, Label)>,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label(self.labels.len() as u32);
        self.labels.push(None);
        label
    }

    /// Bind `label` to the next instruction to be emitted
    pub fn place_label(&mut self, label: Label) -> Result<(), BytecodeError> {
        let position = self.code.len() as u32;
        match self.labels.get_mut(label.0 as usize) {
            Some(slot @ None) => {
                *slot = Some(position);
                Ok(())
            }
            _ => Err(BytecodeError::LabelPlacedTwice { label: label.0 }),
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    /// Emit a branch to `label`; `None` is an unconditional `Goto`
    pub fn emit_jump(&mut self, condition: Option<Condition>, label: Label) {
        self.fixups.push((self.code.len(), label));
        self.code.push(match condition {
            Some(condition) => Instruction::If(condition, 0),
            None => Instruction::Goto(0),
        });
    }

    /// Emit a two-int compare-and-branch to `label`
    pub fn emit_icmp_jump(&mut self, condition: Condition, label: Label) {
        self.fixups.push((self.code.len(), label));
        self.code.push(Instruction::IfICmp(condition, 0));
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Resolve all labels and return the finished instruction stream
    pub fn finish(mut self) -> Result<Vec<Instruction>, BytecodeError> {
        for (index, label) in &self.fixups {
            let target = self
                .labels
                .get(label.0 as usize)
                .copied()
                .flatten()
                .ok_or(BytecodeError::UnplacedLabel { label: label.0 })?;

            trace!("patch jump at {} -> L{} = {}", index, label.0, target);
            self.code[*index].set_target(target);
        }

        Ok(self.code)
    }
}
