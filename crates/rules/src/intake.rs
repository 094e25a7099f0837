//! Lead intake
//!
//! Turns a captured form into a stored lead: id, timestamps, suggested owner
//! and every derived field.

use chrono::{DateTime, Utc};

use leaddesk_config::{CrmConfig, Roster};
use leaddesk_core::{Lead, NewLead};

use crate::assignment::AgentSuggester;
use crate::lead_scoring::{classify_priority, score};
use crate::scope::infer_scope;
use crate::source::classify_source;

/// Re-derive score, priority, source bucket and scope from current inputs
pub fn recompute(lead: &mut Lead, roster: &Roster) {
    lead.score = score(&lead.score_input());
    lead.priority = classify_priority(lead.score);
    lead.source_bucket = classify_source(&lead.source_fields());
    lead.scope = infer_scope(&lead.scope_fields(), roster);
}

/// Intake pipeline shared by the capture route
#[derive(Debug, Clone)]
pub struct LeadIntake {
    roster: Roster,
    suggester: AgentSuggester,
}

impl LeadIntake {
    pub fn new(config: &CrmConfig) -> Self {
        Self::with_suggester(config.roster.clone(), AgentSuggester::from_config(config))
    }

    pub fn with_suggester(roster: Roster, suggester: AgentSuggester) -> Self {
        Self { roster, suggester }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn process(&self, input: NewLead) -> Lead {
        self.process_at(input, Utc::now())
    }

    pub fn process_at(&self, input: NewLead, now: DateTime<Utc>) -> Lead {
        let id = uuid::Uuid::new_v4().to_string();
        let mut lead = Lead::new(id, input, now);

        if lead.assigned_to.is_none() {
            lead.assigned_to = self.suggester.suggest(&lead.brand, &lead.category);
        }
        recompute(&mut lead, &self.roster);

        tracing::info!(
            lead_id = %lead.id,
            score = lead.score,
            priority = lead.priority.as_str(),
            scope = lead.scope.as_str(),
            source = lead.source_bucket.label(),
            assigned_to = lead.assigned_to.as_deref().unwrap_or(""),
            "Lead captured"
        );
        lead
    }

    /// Recompute after a staff edit
    pub fn refresh(&self, lead: &mut Lead) {
        recompute(lead, &self.roster);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaddesk_core::{CrmScope, LeadPatch, LeadStatus, Priority, SourceBucket};

    fn intake() -> LeadIntake {
        LeadIntake::new(&CrmConfig::default())
    }

    fn hot_form() -> NewLead {
        NewLead {
            name: " Ravi ".to_string(),
            brand: "Microsoft".to_string(),
            qty: 120,
            timeline: "This Week".to_string(),
            source: "google ads".to_string(),
            category: "Enterprise".to_string(),
            city: "Chandigarh".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_process_derives_everything() {
        let lead = intake().process(hot_form());
        assert_eq!(lead.name, "Ravi");
        assert_eq!(lead.score, 93);
        assert_eq!(lead.priority, Priority::Hot);
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.source_bucket, SourceBucket::GoogleAds);
        assert_eq!(lead.assigned_to.as_deref(), Some("Nidhi"));
        // Nidhi is unreserved and "enterprise" appears in the requirement
        assert_eq!(lead.scope, CrmScope::Enterprise);
        assert!(uuid::Uuid::parse_str(&lead.id).is_ok());
    }

    #[test]
    fn test_given_owner_is_kept() {
        let form = NewLead {
            assigned_to: Some("Rimpy".to_string()),
            ..hot_form()
        };
        let lead = intake().process(form);
        assert_eq!(lead.assigned_to.as_deref(), Some("Rimpy"));
        assert_eq!(lead.scope, CrmScope::Dealer);
    }

    #[test]
    fn test_negative_qty_clamped() {
        let form = NewLead {
            brand: "Other".to_string(),
            qty: -5,
            ..Default::default()
        };
        let lead = intake().process(form);
        assert_eq!(lead.qty, 0);
        assert_eq!(lead.score, 33);
        assert_eq!(lead.priority, Priority::Cold);
    }

    #[test]
    fn test_refresh_after_patch() {
        let intake = intake();
        let mut lead = intake.process(NewLead {
            brand: "Other".to_string(),
            ..Default::default()
        });
        assert_eq!(lead.priority, Priority::Cold);

        let patch = LeadPatch {
            brand: Some("Microsoft".to_string()),
            qty: Some(300),
            timeline: Some("urgent".to_string()),
            ..Default::default()
        };
        lead.apply_patch(patch, Utc::now());
        intake.refresh(&mut lead);
        assert_eq!(lead.score, 25 + 20 + 24 + 16);
        assert_eq!(lead.priority, Priority::Hot);
    }
}
