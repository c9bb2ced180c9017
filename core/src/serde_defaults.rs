//! Common serde default value functions
//!
//! Used across effect definition sub-structs to avoid duplication.

/// Default for enabled/keep fields
pub fn default_true() -> bool {
    true
}

/// Default effect level
pub fn default_level() -> i16 {
    1
}
