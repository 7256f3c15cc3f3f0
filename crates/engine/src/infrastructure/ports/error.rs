// Error constructors define the full contract - some are for adapters only
#![allow(dead_code)]

//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Container runtime errors.
///
/// `NotFound` and `AlreadyExists` are distinguishable so callers can decide
/// per operation whether absence (or prior existence) is benign; everything
/// unexpected from the control plane lands in `Api`.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("{resource} not found: {name}")]
    NotFound {
        resource: &'static str,
        name: String,
    },

    #[error("{resource} already exists: {name}")]
    AlreadyExists {
        resource: &'static str,
        name: String,
    },

    #[error("Container runtime error in {operation}: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },
}

impl RuntimeError {
    pub fn not_found(resource: &'static str, name: impl ToString) -> Self {
        Self::NotFound {
            resource,
            name: name.to_string(),
        }
    }

    pub fn already_exists(resource: &'static str, name: impl ToString) -> Self {
        Self::AlreadyExists {
            resource,
            name: name.to_string(),
        }
    }

    pub fn api(operation: &'static str, message: impl ToString) -> Self {
        Self::Api {
            operation,
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
