//! Source location tracking for diagnostics
//!
//! Locations are produced by the external scanner and carried unchanged
//! through the AST into every diagnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the source text (line and column are 1-based, offset is 0-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocation {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }

    fn precedes(&self, other: &SourceLocation) -> bool {
        (self.line, self.column) <= (other.line, other.column)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range of source text, both ends inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Create a span covering a single position
    pub fn from_location(location: SourceLocation) -> Self {
        Self { start: location, end: location }
    }

    /// An absent span, as produced for nodes built without source text
    pub fn is_unknown(&self) -> bool {
        *self == SourceSpan::default()
    }

    /// Smallest span covering both `self` and `other`; an unknown span is ignored
    pub fn extend(&self, other: &SourceSpan) -> SourceSpan {
        if self.is_unknown() {
            return *other;
        }
        if other.is_unknown() {
            return *self;
        }

        let start = if self.start.precedes(&other.start) { self.start } else { other.start };
        let end = if other.end.precedes(&self.end) { self.end } else { other.end };

        SourceSpan::new(start, end)
    }
}

impl std::ops::Add for SourceSpan {
    type Output = SourceSpan;

    fn add(self, other: SourceSpan) -> SourceSpan {
        self.extend(&other)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else if self.start.line == self.end.line {
            write!(f, "{}:{}-{}", self.start.line, self.start.column, self.end.column)
        } else {
            write!(
                f,
                "{}:{}-{}:{}",
                self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}

/// Trait for syntax nodes that know where they came from
pub trait HasSpan {
    fn span(&self) -> SourceSpan;
}
