//! Audit log
//!
//! Append-only record of lead captures, edits, exports, notifications and
//! staff logins.

use async_trait::async_trait;
use parking_lot::RwLock;

use leaddesk_core::{AuditEvent, AuditEventType};

use crate::PersistenceError;

/// Filter for [`AuditLog::query`]
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub lead_id: Option<String>,
    pub event_type: Option<AuditEventType>,
    /// Newest `limit` matches; `None` returns all
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn for_lead(lead_id: &str) -> Self {
        Self {
            lead_id: Some(lead_id.to_string()),
            ..Default::default()
        }
    }

    fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(lead_id) = &self.lead_id {
            if event.lead_id.as_deref() != Some(lead_id.as_str()) {
                return false;
            }
        }
        self.event_type.map_or(true, |t| event.event_type == t)
    }
}

/// Audit log trait
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, event: AuditEvent) -> Result<(), PersistenceError>;

    /// Matching events, newest first
    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEvent>, PersistenceError>;
}

/// Vec-backed audit log with a retention cap
pub struct InMemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
    capacity: usize,
}

impl InMemoryAuditLog {
    pub const DEFAULT_CAPACITY: usize = 10_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Oldest events are dropped beyond `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, event: AuditEvent) -> Result<(), PersistenceError> {
        tracing::debug!(
            event_type = event.event_type.as_str(),
            lead_id = event.lead_id.as_deref().unwrap_or("-"),
            actor = %event.actor,
            "Audit event"
        );

        let mut events = self.events.write();
        events.push(event);
        if events.len() > self.capacity {
            let excess = events.len() - self.capacity;
            events.drain(..excess);
        }
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEvent>, PersistenceError> {
        let events = self.events.read();
        let matches = events.iter().rev().filter(|e| query.matches(e)).cloned();
        Ok(match query.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: AuditEventType, lead: Option<&str>) -> AuditEvent {
        AuditEvent::new(kind, lead, "tester", json!({}))
    }

    #[tokio::test]
    async fn test_query_newest_first() {
        let log = InMemoryAuditLog::new();
        log.append(event(AuditEventType::LeadCaptured, Some("a"))).await.unwrap();
        log.append(event(AuditEventType::LeadUpdated, Some("a"))).await.unwrap();
        log.append(event(AuditEventType::Login, None)).await.unwrap();

        let all = log.query(&AuditQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].event_type, AuditEventType::Login);

        let for_a = log.query(&AuditQuery::for_lead("a")).await.unwrap();
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].event_type, AuditEventType::LeadUpdated);
    }

    #[tokio::test]
    async fn test_query_by_type_and_limit() {
        let log = InMemoryAuditLog::new();
        for _ in 0..5 {
            log.append(event(AuditEventType::LeadCaptured, Some("x"))).await.unwrap();
        }
        log.append(event(AuditEventType::Logout, None)).await.unwrap();

        let query = AuditQuery {
            event_type: Some(AuditEventType::LeadCaptured),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(log.query(&query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        let log = InMemoryAuditLog::with_capacity(2);
        log.append(event(AuditEventType::LeadCaptured, Some("1"))).await.unwrap();
        log.append(event(AuditEventType::LeadCaptured, Some("2"))).await.unwrap();
        log.append(event(AuditEventType::LeadCaptured, Some("3"))).await.unwrap();

        let ids: Vec<_> = log
            .query(&AuditQuery::default())
            .await
            .unwrap()
            .into_iter()
            .filter_map(|e| e.lead_id)
            .collect();
        assert_eq!(ids, vec!["3", "2"]);
    }
}
