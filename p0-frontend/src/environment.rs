//! Block-structured name tables
//!
//! `ScopedMap` is shared by the translator (names to bindings) and the code
//! generator (names to local slots). Lookups search from the innermost frame
//! outwards, so an inner binding shadows an outer one of the same name.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScopedMap<V> {
    frames: Vec<HashMap<String, V>>,
}

impl<V> ScopedMap<V> {
    /// A map with a single, outermost frame
    pub fn new() -> Self {
        Self { frames: vec![HashMap::new()] }
    }

    pub fn open_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Discard the innermost frame and everything bound in it. The outermost
    /// frame is never discarded.
    pub fn close_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind `name` in the innermost frame, replacing a binding already there
    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `name` is bound in the innermost frame itself
    pub fn in_current_scope(&self, name: &str) -> bool {
        self.frames.last().is_some_and(|frame| frame.contains_key(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl<V> Default for ScopedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
