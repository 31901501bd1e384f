//! Bytecode errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BytecodeError {
    #[error("label L{label} is the target of a jump but was never placed")]
    UnplacedLabel { label: u32 },

    #[error("label L{label} placed twice")]
    LabelPlacedTwice { label: u32 },

    #[error("not a p0 module: bad magic")]
    BadMagic,

    #[error("unsupported module version {version}")]
    UnsupportedVersion { version: u16 },

    #[error("unexpected end of module at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unknown opcode 0x{opcode:02X} at byte {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("invalid {what} tag {tag} at byte {offset}")]
    InvalidTag { what: &'static str, tag: u8, offset: usize },

    #[error("invalid UTF-8 string at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("invalid method descriptor '{descriptor}'")]
    InvalidDescriptor { descriptor: String },

    #[error("trailing {count} byte(s) after module")]
    TrailingBytes { count: usize },
}
