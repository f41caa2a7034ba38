// Model Errors - Record construction failures
//
// Only record construction can fail. Missing names and diameters are not
// errors, and neither are lookup misses or unmatched designations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Designation is the join key and must be present
    #[error("designation must not be empty")]
    EmptyDesignation,

    #[error("invalid close approach time {value:?}: expected YYYY-Mon-DD HH:MM")]
    InvalidTime { value: String },

    #[error("invalid {field} {value:?}: not a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid {field} {value}: must be finite and non-negative")]
    OutOfRange { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
