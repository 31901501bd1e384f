//! Local slot allocation
//!
//! Each local binding gets the next free slot. Closing a scope rewinds the
//! free-slot counter to where it was when the scope opened, so sibling
//! scopes reuse the same slot numbers. `max_locals` remembers the highest
//! slot count ever reached, which is the frame size of the routine.

use crate::environment::ScopedMap;
use p0_common::CompilerError;

#[derive(Debug)]
pub struct SlotEnvironment {
    names: ScopedMap<u16>,
    offset: u16,
    saved: Vec<u16>,
    max_locals: u16,
}

impl SlotEnvironment {
    /// Slots below `first_free` are reserved
    pub fn new(first_free: u16) -> Self {
        Self {
            names: ScopedMap::new(),
            offset: first_free,
            saved: Vec::new(),
            max_locals: first_free,
        }
    }

    pub fn open_scope(&mut self) {
        self.saved.push(self.offset);
        self.names.open_scope();
    }

    pub fn close_scope(&mut self) {
        if let Some(offset) = self.saved.pop() {
            self.offset = offset;
            self.names.close_scope();
        }
    }

    /// Allocate the next slot to `name` in the innermost scope
    pub fn new_binding(&mut self, name: &str) -> Result<u16, CompilerError> {
        let slot = self.offset;
        self.offset = slot
            .checked_add(1)
            .ok_or_else(|| CompilerError::internal(format!("no local slot left for '{name}'")))?;
        self.max_locals = self.max_locals.max(self.offset);
        self.names.insert(name, slot);
        Ok(slot)
    }

    /// Slot of a local, `None` for names that live in static fields
    pub fn slot(&self, name: &str) -> Option<u16> {
        self.names.get(name).copied()
    }

    pub fn max_locals(&self) -> u16 {
        self.max_locals
    }
}
