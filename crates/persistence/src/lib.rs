//! Storage collaborators for LeadDesk
//!
//! Provides:
//! - Lead storage (list, get, insert, atomic update)
//! - Audit logging
//! - Simulated WhatsApp/email notifications
//!
//! Every store is an async trait with an in-memory implementation. Instances
//! are created by the caller and injected, so nothing is process-global.

use std::sync::Arc;

pub mod audit;
pub mod error;
pub mod leads;
pub mod notifications;

pub use audit::{AuditLog, AuditQuery, InMemoryAuditLog};
pub use error::PersistenceError;
pub use leads::{InMemoryLeadStore, LeadStore, LeadUpdate};
pub use notifications::{
    format_lead_alert, NotificationChannel, NotificationMessage, NotificationResult, Notifier,
    SimulatedNotifier,
};

/// Stores used by the server
pub struct PersistenceLayer {
    pub leads: Arc<dyn LeadStore>,
    pub audit: Arc<dyn AuditLog>,
}

impl PersistenceLayer {
    /// In-memory stores
    pub fn in_memory() -> Self {
        Self {
            leads: Arc::new(InMemoryLeadStore::new()),
            audit: Arc::new(InMemoryAuditLog::new()),
        }
    }
}
