//! Error types for mapping operations.

use std::fmt;

/// Errors from mapping operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Field not present in the catalog.
    UnknownField(String),
    /// Required fields without a mapping, default or override.
    RequiredUnsatisfied(Vec<String>),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(field) => write!(f, "Unknown field: {field}"),
            Self::RequiredUnsatisfied(fields) => {
                write!(f, "Required fields not satisfied: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for MappingError {}
