//! Central configuration and constants for the p0 VM

// Routine names
pub const INITIALIZER: &str = "<init>";
pub const ENTRY_ROUTINE: &str = "main";

// VM limits
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

// Output formatting
pub const TRUE_TEXT: &str = "True";
pub const FALSE_TEXT: &str = "False";
pub const INFINITY_TEXT: &str = "Infinity";
pub const NAN_TEXT: &str = "NaN";
