//! Persistence error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<PersistenceError> for leaddesk_core::Error {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(id) => leaddesk_core::Error::NotFound(id),
            PersistenceError::Delivery(msg) => leaddesk_core::Error::Notification(msg),
            other => leaddesk_core::Error::Storage(other.to_string()),
        }
    }
}
