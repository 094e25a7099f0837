//! Role-scoped lead access
//!
//! `can_access` is a pure predicate evaluated per lead on every list, detail,
//! export and event request. Nothing is cached between requests because lead
//! ownership changes.

use leaddesk_config::Roster;
use leaddesk_core::{CrmRole, CrmScope, Lead, ScopeFields, StaffSession};

use crate::scope::infer_scope;

/// Whether `session` may see `lead`
pub fn can_access(session: &StaffSession, lead: &ScopeFields<'_>, roster: &Roster) -> bool {
    if session.is_unrestricted() {
        return true;
    }

    match &session.crm_role {
        CrmRole::Dealer => in_scope(CrmScope::Dealer, lead, roster),
        CrmRole::Enterprise => in_scope(CrmScope::Enterprise, lead, roster),
        CrmRole::LocalOps => in_scope(CrmScope::LocalOps, lead, roster),
        // Unknown roles get the strictest rule
        _ => owns(session, lead),
    }
}

/// Leads visible to `session`, in input order
pub fn visible_leads<'a>(
    session: &StaffSession,
    leads: impl IntoIterator<Item = &'a Lead>,
    roster: &Roster,
) -> Vec<&'a Lead> {
    leads
        .into_iter()
        .filter(|lead| can_access(session, &lead.scope_fields(), roster))
        .collect()
}

fn in_scope(scope: CrmScope, lead: &ScopeFields<'_>, roster: &Roster) -> bool {
    if infer_scope(lead, roster) == scope {
        return true;
    }
    owner(lead).is_some_and(|owner| roster.is_reserved(scope, owner))
}

fn owns(session: &StaffSession, lead: &ScopeFields<'_>) -> bool {
    match (session.assignee(), owner(lead)) {
        (Some(assignee), Some(owner)) => assignee == owner,
        _ => false,
    }
}

fn owner<'a>(lead: &ScopeFields<'a>) -> Option<&'a str> {
    lead.assigned_to.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::default()
    }

    fn owned_by(name: &str) -> ScopeFields<'_> {
        ScopeFields {
            assigned_to: Some(name),
            ..Default::default()
        }
    }

    #[test]
    fn test_management_sees_everything() {
        let session = StaffSession::management("owner");
        assert!(can_access(&session, &ScopeFields::default(), &roster()));

        let mut flagged = StaffSession::with_role("ops", CrmRole::Other("X".into()), None);
        flagged.is_management = true;
        assert!(can_access(&flagged, &ScopeFields::default(), &roster()));
    }

    #[test]
    fn test_admin_roles_unrestricted() {
        for role in [CrmRole::SuperAdmin, CrmRole::Admin] {
            let session = StaffSession::with_role("admin", role, None);
            assert!(can_access(&session, &owned_by("Nidhi"), &roster()));
        }
    }

    #[test]
    fn test_sales_requires_exact_assignee() {
        let r = roster();
        let session = StaffSession::with_role("nidhi", CrmRole::Sales, Some("Nidhi"));
        assert!(can_access(&session, &owned_by("Nidhi"), &r));
        assert!(!can_access(&session, &owned_by(" Nidhi "), &r));
        assert!(!can_access(&session, &owned_by("nidhi"), &r));
        assert!(!can_access(&session, &owned_by("Simran"), &r));
        assert!(!can_access(&session, &ScopeFields::default(), &r));
    }

    #[test]
    fn test_sales_without_assignee_sees_nothing() {
        let r = roster();
        for assignee in [None, Some(""), Some("   ")] {
            let session = StaffSession::with_role("temp", CrmRole::Sales, assignee);
            assert!(!can_access(&session, &owned_by("Nidhi"), &r));
            assert!(!can_access(&session, &ScopeFields::default(), &r));
        }
    }

    #[test]
    fn test_dealer_by_owner_or_text() {
        let r = roster();
        let session = StaffSession::with_role("dealer-desk", CrmRole::Dealer, None);
        assert!(can_access(&session, &owned_by("Rimpy"), &r));

        let reseller = ScopeFields {
            assigned_to: Some("Nidhi"),
            notes: "reseller enquiry",
            ..Default::default()
        };
        assert!(can_access(&session, &reseller, &r));

        // A reserved SALES owner settles the scope before the text is read
        let sales_owned = ScopeFields {
            assigned_to: Some("Simran"),
            notes: "reseller enquiry",
            ..Default::default()
        };
        assert!(!can_access(&session, &sales_owned, &r));
        assert!(!can_access(&session, &owned_by("Harpreet"), &r));
        assert!(!can_access(&session, &owned_by("Nidhi"), &r));
    }

    #[test]
    fn test_enterprise_and_local_ops() {
        let r = roster();
        let enterprise = StaffSession::with_role("ent", CrmRole::Enterprise, None);
        let local = StaffSession::with_role("ops", CrmRole::LocalOps, None);

        let siem = ScopeFields {
            requirement: "SIEM for datacenter",
            ..Default::default()
        };
        assert!(can_access(&enterprise, &siem, &r));
        assert!(!can_access(&local, &siem, &r));

        assert!(can_access(&local, &owned_by("Manpreet"), &r));
        assert!(can_access(&local, &owned_by("Gurpreet"), &r));
        assert!(!can_access(&enterprise, &owned_by("Gurpreet"), &r));
    }

    #[test]
    fn test_unknown_role_falls_back_to_assignee() {
        let r = roster();
        let session = StaffSession::with_role("x", CrmRole::parse("auditor"), Some("Pooja"));
        assert!(can_access(&session, &owned_by("Pooja"), &r));
        assert!(!can_access(&session, &owned_by("Rimpy"), &r));
    }
}
