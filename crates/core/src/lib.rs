//! Core domain types for the LeadDesk CRM
//!
//! This crate provides the types shared by every other crate:
//! - `Lead` and its classification vocabulary (status, priority, band, scope, source)
//! - Staff sessions and CRM roles
//! - Roster agents
//! - Audit events
//! - Error types

pub mod agent;
pub mod audit;
pub mod error;
pub mod lead;
pub mod session;

pub use agent::{Agent, AgentRole};
pub use audit::{AuditEvent, AuditEventType};
pub use error::{Error, Result};
pub use lead::{
    CrmScope, Lead, LeadPatch, LeadScoreInput, LeadStatus, NewLead, Priority, ScopeFields,
    ScoreBand, SourceBucket, SourceFields,
};
pub use session::{CrmRole, StaffSession};
