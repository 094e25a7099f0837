//! Error types shared across the LeadDesk crates

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lead not found: {0}")]
    NotFound(String),

    #[error("Access denied to lead {lead_id} for {actor}")]
    Forbidden { lead_id: String, actor: String },

    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl Error {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
