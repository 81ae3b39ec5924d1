//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during caller input validation.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' exceeds maximum length {max}, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates a too long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }
}

/// Error codes surfaced across the turn protocol boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Caller input errors
    ValidationError,

    // Session lifecycle errors
    SessionNotFound,
    SessionExpired,
    SessionComplete,

    // Upstream capability errors (contained within a turn, informational)
    GenerationDegraded,

    // Infrastructure errors
    CacheError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::SessionExpired => "SESSION_EXPIRED",
            ErrorCode::SessionComplete => "SESSION_COMPLETE",
            ErrorCode::GenerationDegraded => "GENERATION_DEGRADED",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}
