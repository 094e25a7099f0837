//! Lead rules for LeadDesk
//!
//! Pure decision functions shared by the capture form and the admin console:
//! - Lead scoring with priority and display band
//! - Acquisition source bucketing and the "by source" report
//! - Scope inference from owner and free text
//! - Role-scoped access control
//! - Agent suggestion at intake
//!
//! Everything here is synchronous and free of I/O. The only interior state is
//! the pick counter or RNG held by an [`assignment::Picker`] instance.

pub mod access;
pub mod assignment;
pub mod intake;
pub mod lead_scoring;
mod matching;
pub mod scope;
pub mod source;

pub use access::{can_access, visible_leads};
pub use assignment::{
    picker_for, AgentSuggester, ClockPicker, Picker, RandomPicker, RoundRobinPicker,
};
pub use intake::{recompute, LeadIntake};
pub use lead_scoring::{
    classify_priority, score, score_band, score_breakdown, ScoreBreakdown, BASE_SCORE,
    HOT_THRESHOLD, MAX_SCORE, WARM_THRESHOLD,
};
pub use scope::{infer_scope, owner_scope};
pub use source::{classify_source, source_report, SourceCount, SourceReport};
