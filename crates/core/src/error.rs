//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, conflicts, illegal transitions, authorization).
/// Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed validation (e.g. empty name, unknown category).
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The target is already taken (occupied location, duplicate code, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The operation is not permitted in the entity's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The caller lacks the required role or does not own the entity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } | DomainError::InvalidId(_) => "validation_error",
            DomainError::NotFound(_) => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::InvalidState(_) => "invalid_state",
            DomainError::Unauthorized(_) => "unauthorized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_distinguish_error_kinds() {
        assert_eq!(DomainError::validation("name", "empty").code(), "validation_error");
        assert_eq!(DomainError::invalid_id("x").code(), "validation_error");
        assert_eq!(DomainError::not_found("item").code(), "not_found");
        assert_eq!(DomainError::conflict("occupied").code(), "conflict");
        assert_eq!(DomainError::invalid_state("released").code(), "invalid_state");
        assert_eq!(DomainError::unauthorized("staff only").code(), "unauthorized");
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = DomainError::validation("name", "cannot be empty");
        assert_eq!(err.to_string(), "validation failed on `name`: cannot be empty");
    }
}
