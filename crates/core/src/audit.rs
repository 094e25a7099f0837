//! Audit trail events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventType {
    #[serde(rename = "lead.captured")]
    LeadCaptured,
    #[serde(rename = "lead.updated")]
    LeadUpdated,
    #[serde(rename = "lead.exported")]
    LeadExported,
    #[serde(rename = "notification.sent")]
    NotificationSent,
    #[serde(rename = "notification.failed")]
    NotificationFailed,
    #[serde(rename = "session.login")]
    Login,
    #[serde(rename = "session.logout")]
    Logout,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeadCaptured => "lead.captured",
            Self::LeadUpdated => "lead.updated",
            Self::LeadExported => "lead.exported",
            Self::NotificationSent => "notification.sent",
            Self::NotificationFailed => "notification.failed",
            Self::Login => "session.login",
            Self::Logout => "session.logout",
        }
    }
}

/// Single audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: AuditEventType,
    pub lead_id: Option<String>,
    pub actor: String,
    pub details: serde_json::Value,
    pub at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        event_type: AuditEventType,
        lead_id: Option<&str>,
        actor: &str,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            lead_id: lead_id.map(str::to_string),
            actor: actor.to_string(),
            details,
            at: Utc::now(),
        }
    }
}
