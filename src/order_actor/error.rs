use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::lifecycle::LifecycleError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Invalid rider: {0}")]
    InvalidRider(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// The order kept changing between read and write. Re-read and retry.
    #[error("Order {id} changed concurrently after {attempts} attempts; re-read and retry")]
    ConflictRetryable { id: String, attempts: u32 },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Rejected(msg) => OrderError::ValidationError(msg),
            FrameworkError::Conflict { id, .. } => OrderError::ConflictRetryable { id, attempts: 1 },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
