//! Service-level error taxonomy shared by every write and read operation.
//!
//! Validation and conflict failures are expected outcomes of user input.
//! `Internal` is the only variant that indicates something went wrong
//! on our side.

use crate::db::DatabaseError;
use crate::identity::IdentityError;
use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Forbidden")]
    Forbidden,
    #[error("Internal error: {0}")]
    Internal(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, .. } => {
                ServiceError::NotFound(format!("{entity_type} not found"))
            }
            DatabaseError::ConstraintViolation(detail) => {
                tracing::debug!(detail, "Write rejected by uniqueness constraint");
                ServiceError::Conflict("The record conflicts with an existing one".into())
            }
            other => ServiceError::Internal(other),
        }
    }
}

impl ServiceError {
    /// Convert a write failure, reporting a uniqueness violation as `message`.
    pub fn conflict_or(err: DatabaseError, message: &str) -> Self {
        match err {
            DatabaseError::ConstraintViolation(detail) => {
                tracing::debug!(detail, "Write rejected by uniqueness constraint");
                ServiceError::Conflict(message.to_string())
            }
            other => ServiceError::from(other),
        }
    }
}

impl From<IdentityError> for ServiceError {
    fn from(err: IdentityError) -> Self {
        match err {
            e @ IdentityError::NotFound { .. } => ServiceError::NotFound(e.to_string()),
            IdentityError::Database(e) => ServiceError::from(e),
        }
    }
}
