//! LeadDesk Server
//!
//! HTTP API for the public capture form and the staff admin console.

pub mod auth;
pub mod http;
pub mod leads;
pub mod metrics;
pub mod rate_limit;
pub mod state;

pub use auth::{auth_middleware, SessionManager, SessionToken};
pub use http::create_router;
pub use metrics::{
    init_metrics, record_access_denied, record_lead_captured, record_rate_limited,
    record_request,
};
pub use rate_limit::{RateLimitError, RateLimiter};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use leaddesk_persistence::PersistenceError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limit exceeded")]
    RateLimit(#[from] RateLimitError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Persistence(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl From<leaddesk_core::Error> for ServerError {
    fn from(err: leaddesk_core::Error) -> Self {
        use leaddesk_core::Error;
        match err {
            Error::NotFound(what) => ServerError::NotFound(what),
            Error::Forbidden { lead_id, .. } => ServerError::Forbidden(format!("lead {}", lead_id)),
            Error::InvalidInput { field, message } => {
                ServerError::InvalidRequest(format!("{} {}", field, message))
            },
            Error::Storage(msg) => ServerError::Persistence(msg),
            Error::Notification(msg) => ServerError::Internal(msg),
        }
    }
}

impl From<PersistenceError> for ServerError {
    fn from(err: PersistenceError) -> Self {
        leaddesk_core::Error::from(err).into()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut response =
            (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response();
        if let ServerError::RateLimit(limit) = &self {
            if let Ok(value) = limit.retry_after_secs.to_string().parse() {
                response
                    .headers_mut()
                    .insert(axum::http::header::RETRY_AFTER, value);
            }
        }
        response
    }
}
