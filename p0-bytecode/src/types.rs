//! Storage types and method descriptors
//!
//! Every value that lives in a field, a local slot or a routine signature has
//! one of four storage types. Descriptors spell them with one character each,
//! so `fun add(a: Int, b: Int): Int` becomes `(II)I`.

use crate::errors::BytecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Int,
    Float,
    Bool,
    String,
}

impl FieldType {
    pub fn descriptor(&self) -> char {
        match self {
            FieldType::Int => 'I',
            FieldType::Float => 'F',
            FieldType::Bool => 'Z',
            FieldType::String => 'S',
        }
    }

    pub fn from_descriptor(c: char) -> Option<FieldType> {
        match c {
            'I' => Some(FieldType::Int),
            'F' => Some(FieldType::Float),
            'Z' => Some(FieldType::Bool),
            'S' => Some(FieldType::String),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

/// Parameter and result types of a routine, `None` result meaning void
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    pub result: Option<FieldType>,
}

impl MethodDescriptor {
    pub fn new(parameters: Vec<FieldType>, result: Option<FieldType>) -> Self {
        Self { parameters, result }
    }

    /// `()V`
    pub fn void() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, ")")?;
        match self.result {
            Some(result) => write!(f, "{result}"),
            None => write!(f, "V"),
        }
    }
}

impl FromStr for MethodDescriptor {
    type Err = BytecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BytecodeError::InvalidDescriptor { descriptor: s.to_string() };

        let rest = s.strip_prefix('(').ok_or_else(invalid)?;
        let (params, result) = rest.split_once(')').ok_or_else(invalid)?;

        let parameters = params
            .chars()
            .map(|c| FieldType::from_descriptor(c).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result_chars = result.chars();
        let result = match (result_chars.next(), result_chars.next()) {
            (Some('V'), None) => None,
            (Some(c), None) => Some(FieldType::from_descriptor(c).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        };

        Ok(Self { parameters, result })
    }
}
