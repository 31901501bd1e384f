//! Module and static fields
//!
//! A module is the unit the compiler emits for one program: its static
//! fields with their initial values and its routines.

use crate::instruction::Instruction;
use crate::types::{FieldType, MethodDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Initial value of a static field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
}

impl Constant {
    pub fn field_type(&self) -> FieldType {
        match self {
            Constant::Int(_) => FieldType::Int,
            Constant::Float(_) => FieldType::Float,
            Constant::Bool(_) => FieldType::Bool,
            Constant::String(_) => FieldType::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub is_final: bool,
    pub field_type: FieldType,
    pub initial: Constant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub descriptor: MethodDescriptor,
    /// Number of local slots an activation needs
    pub max_locals: u16,
    pub code: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub fields: Vec<Field>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Human readable listing
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "; module {}", self.name);
        let _ = writeln!(output, "; fields: {}", self.fields.len());
        let _ = writeln!(output, "; functions: {}", self.functions.len());

        if !self.fields.is_empty() {
            output.push('\n');
        }
        for field in &self.fields {
            let _ = writeln!(
                output,
                ".field static{} {} {} = {}",
                if field.is_final { " final" } else { "" },
                field.name,
                field.field_type,
                constant_text(&field.initial)
            );
        }

        for function in &self.functions {
            let _ = writeln!(output, "\n.method static {} {}", function.name, function.descriptor);
            let _ = writeln!(output, "    .locals {}", function.max_locals);
            for (index, instruction) in function.code.iter().enumerate() {
                let _ = writeln!(output, "    {index:4}: {instruction}");
            }
            output.push_str(".end method\n");
        }

        output
    }
}

fn constant_text(constant: &Constant) -> String {
    match constant {
        Constant::Int(v) => v.to_string(),
        Constant::Float(v) => format!("{v:?}"),
        Constant::Bool(v) => v.to_string(),
        Constant::String(v) => format!("{v:?}"),
    }
}
