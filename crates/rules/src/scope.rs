//! Scope inference
//!
//! A lead's scope comes from its owner first: names reserved on the roster
//! for the dealer desk, the enterprise desk, local ops, and general sales are
//! checked in that order. Without a reserved owner the free text (source,
//! campaign, requirement, notes) decides.

use leaddesk_config::Roster;
use leaddesk_core::{CrmScope, ScopeFields};

use crate::matching::{first_match, joined_lowercase, KeywordRule};

/// Owner lookup order
const OWNER_ORDER: [CrmScope; 4] = [
    CrmScope::Dealer,
    CrmScope::Enterprise,
    CrmScope::LocalOps,
    CrmScope::Sales,
];

const TEXT_RULES: [KeywordRule<CrmScope>; 3] = [
    KeywordRule::new(
        &["dealer", "reseller", "channel partner", "partner program"],
        CrmScope::Dealer,
    ),
    KeywordRule::new(
        &["enterprise", "datacenter", "siem", "soc", "xdr", "edr", "zero trust"],
        CrmScope::Enterprise,
    ),
    KeywordRule::new(
        &[
            "install",
            "installation",
            "onsite",
            "on-site",
            "field support",
            "local deployment",
        ],
        CrmScope::LocalOps,
    ),
];

/// Scope reserved for the lead's owner, if any
pub fn owner_scope(assigned_to: Option<&str>, roster: &Roster) -> Option<CrmScope> {
    let owner = assigned_to.filter(|s| !s.is_empty())?;
    OWNER_ORDER
        .into_iter()
        .find(|scope| roster.is_reserved(*scope, owner))
}

/// Infer the CRM scope of a lead; total over every input
pub fn infer_scope(lead: &ScopeFields<'_>, roster: &Roster) -> CrmScope {
    if let Some(scope) = owner_scope(lead.assigned_to, roster) {
        return scope;
    }

    let text = joined_lowercase(&[lead.source, lead.campaign, lead.requirement, lead.notes]);
    if let Some(scope) = first_match(&text, &TEXT_RULES) {
        return scope;
    }

    if text.is_empty() {
        CrmScope::Unscoped
    } else {
        CrmScope::Sales
    }
}
