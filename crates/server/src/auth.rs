//! Staff authentication
//!
//! Staff sign in with a username and access key from configuration and get
//! an opaque bearer token. The token maps to a [`StaffSession`] until it
//! expires or the user logs out.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use leaddesk_core::{AuditEvent, AuditEventType, StaffSession};

use crate::state::AppState;
use crate::ServerError;

/// Bearer token of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

#[derive(Debug, Clone)]
struct SessionEntry {
    session: StaffSession,
    expires_at: DateTime<Utc>,
}

/// Token to session map with a fixed lifetime
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes.max(1)),
        }
    }

    /// Issue a token for `session`
    pub fn create(&self, session: StaffSession) -> (String, DateTime<Utc>) {
        let token = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        let expires_at = Utc::now() + self.ttl;

        let mut sessions = self.sessions.write();
        sessions.retain(|_, entry| entry.expires_at > Utc::now());
        sessions.insert(
            token.clone(),
            SessionEntry {
                session,
                expires_at,
            },
        );
        (token, expires_at)
    }

    /// Session for a live token
    pub fn get(&self, token: &str) -> Option<StaffSession> {
        self.get_at(token, Utc::now())
    }

    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<StaffSession> {
        let sessions = self.sessions.read();
        sessions
            .get(token)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.session.clone())
    }

    pub fn remove(&self, token: &str) -> Option<StaffSession> {
        self.sessions.write().remove(token).map(|e| e.session)
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(alias = "accessKey")]
    pub access_key: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub session: StaffSession,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    let account = state
        .config
        .staff_account(&request.username)
        .filter(|a| constant_time_compare(a.access_key.as_bytes(), request.access_key.as_bytes()));

    let Some(account) = account else {
        tracing::warn!(username = %request.username, "Rejected staff login");
        return Err(ServerError::Auth("Invalid username or access key".to_string()));
    };

    let session = account.to_session();
    let (token, expires_at) = state.sessions.create(session.clone());
    tracing::info!(
        username = %session.username,
        crm_role = session.crm_role.as_str(),
        management = session.is_management,
        "Staff signed in"
    );

    state
        .audit
        .append(AuditEvent::new(
            AuditEventType::Login,
            None,
            &session.username,
            serde_json::json!({ "crmRole": session.crm_role.as_str() }),
        ))
        .await?;

    Ok(Json(LoginResponse {
        token,
        expires_at,
        session,
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.sessions.remove(&token.0);
    state
        .audit
        .append(AuditEvent::new(
            AuditEventType::Logout,
            None,
            &session.username,
            serde_json::json!({}),
        ))
        .await?;
    Ok(Json(serde_json::json!({ "status": "signed_out" })))
}

fn is_public(public_paths: &[String], path: &str) -> bool {
    public_paths.iter().any(|p| path.starts_with(p.as_str()))
}

/// Bearer token middleware
///
/// Public paths pass through. Every other request must carry
/// `Authorization: Bearer <token>` for a live session; the session and token
/// are attached to the request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public(&state.config.server.auth.public_paths, request.uri().path()) {
        return next.run(request).await;
    }

    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => token.trim().to_string(),
            None => {
                return ServerError::InvalidRequest(
                    "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
                )
                .into_response()
            },
        },
        None => {
            return ServerError::Auth("Missing Authorization header".to_string()).into_response()
        },
    };

    match state.sessions.get(&token) {
        Some(session) => {
            request.extensions_mut().insert(session);
            request.extensions_mut().insert(SessionToken(token));
            next.run(request).await
        },
        None => ServerError::Auth("Invalid or expired session".to_string()).into_response(),
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"secret", b"secret"));
        assert!(!constant_time_compare(b"secret", b"secre"));
        assert!(!constant_time_compare(b"secret", b"secreT"));
    }

    #[test]
    fn test_session_lifecycle() {
        let manager = SessionManager::new(30);
        let (token, expires_at) = manager.create(StaffSession::management("owner"));
        assert!(expires_at > Utc::now());
        assert_eq!(token.len(), 64);
        assert_eq!(manager.get(&token).map(|s| s.username), Some("owner".to_string()));
        assert_eq!(manager.count(), 1);

        assert!(manager.remove(&token).is_some());
        assert!(manager.get(&token).is_none());
    }

    #[test]
    fn test_expired_session_rejected() {
        let manager = SessionManager::new(30);
        let (token, _) = manager.create(StaffSession::management("owner"));
        let later = Utc::now() + Duration::minutes(31);
        assert!(manager.get_at(&token, later).is_none());
    }

    #[test]
    fn test_unknown_token_rejected() {
        let manager = SessionManager::new(30);
        assert!(manager.get("nope").is_none());
    }

    #[test]
    fn test_public_path_prefix() {
        let paths = vec!["/health".to_string(), "/api/capture".to_string()];
        assert!(is_public(&paths, "/health"));
        assert!(is_public(&paths, "/api/capture"));
        assert!(!is_public(&paths, "/api/leads"));
    }
}
