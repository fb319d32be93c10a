//! Manager error taxonomy.

use crate::store::StoreError;
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors returned by the feedback and reservation managers.
///
/// Validation and authorization failures are raised before anything is
/// written and can be fixed by the caller. Store failures are terminal for
/// the request and are never retried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// Malformed or missing input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced entity does not exist
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of entity
        resource: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The caller's identity lacks the required scope
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for manager operations.
pub type Result<T> = std::result::Result<T, ManagerError>;
