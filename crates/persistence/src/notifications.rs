//! Simulated outbound notifications
//!
//! Messages are NOT actually sent over WhatsApp or email. They are recorded
//! in memory and logged so the sales desk flow can be exercised end to end.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leaddesk_core::Lead;

use crate::PersistenceError;

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    WhatsApp,
    Email,
}

impl NotificationChannel {
    /// Email for addresses, WhatsApp for anything else
    pub fn for_recipient(recipient: &str) -> Self {
        if recipient.contains('@') {
            Self::Email
        } else {
            Self::WhatsApp
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::Email => "email",
        }
    }
}

/// Recorded message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub message_id: Uuid,
    pub channel: NotificationChannel,
    pub recipient: String,
    pub lead_id: Option<String>,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Result of sending a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub message_id: Uuid,
    pub channel: NotificationChannel,
    pub sent_at: DateTime<Utc>,
    pub simulated: bool,
}

/// Notification service trait
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        body: &str,
        lead_id: Option<&str>,
    ) -> Result<NotificationResult, PersistenceError>;
}

/// Render the sales desk alert for a newly captured lead
pub fn format_lead_alert(lead: &Lead) -> String {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    format!(
        "New {} lead ({}/100): {} {}. Brand: {}, Qty: {}, City: {}, Timeline: {}. \
         Phone: {}. Owner: {}.",
        lead.priority.as_str(),
        lead.score,
        or_dash(&lead.name),
        if lead.company.is_empty() {
            String::new()
        } else {
            format!("({})", lead.company)
        },
        or_dash(&lead.brand),
        lead.qty,
        or_dash(&lead.city),
        or_dash(&lead.timeline),
        or_dash(&lead.phone),
        lead.assigned_to.as_deref().unwrap_or("unassigned"),
    )
}

/// Simulated notifier that records every message
#[derive(Default)]
pub struct SimulatedNotifier {
    sent: RwLock<Vec<NotificationMessage>>,
    fail_with: Option<String>,
}

impl SimulatedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier whose every send fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// Messages recorded so far, oldest first
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.read().clone()
    }
}

#[async_trait]
impl Notifier for SimulatedNotifier {
    async fn send(
        &self,
        recipient: &str,
        body: &str,
        lead_id: Option<&str>,
    ) -> Result<NotificationResult, PersistenceError> {
        if let Some(reason) = &self.fail_with {
            return Err(PersistenceError::Delivery(reason.clone()));
        }

        let channel = NotificationChannel::for_recipient(recipient);
        let message = NotificationMessage {
            message_id: Uuid::new_v4(),
            channel,
            recipient: recipient.to_string(),
            lead_id: lead_id.map(str::to_string),
            body: body.to_string(),
            sent_at: Utc::now(),
        };

        tracing::info!(
            recipient = %recipient,
            channel = channel.as_str(),
            message_id = %message.message_id,
            "Notification simulated"
        );
        tracing::debug!(body = %body, "Notification content (simulated)");

        let result = NotificationResult {
            message_id: message.message_id,
            channel,
            sent_at: message.sent_at,
            simulated: true,
        };
        self.sent.write().push(message);
        Ok(result)
    }
}
