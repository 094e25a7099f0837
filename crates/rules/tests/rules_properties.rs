//! Property-style checks over the public rule functions
//!
//! These walk whole input ranges rather than single examples.

use leaddesk_config::Roster;
use leaddesk_core::{
    CrmRole, CrmScope, LeadScoreInput, Priority, ScopeFields, ScoreBand, StaffSession,
};
use leaddesk_rules::{can_access, classify_priority, infer_scope, score, score_band, score_breakdown};

const QTY_PROBES: [u32; 14] = [0, 1, 9, 10, 29, 30, 99, 100, 249, 250, 251, 1000, 65_535, u32::MAX];

/// Quantity contribution never shrinks as qty grows
#[test]
fn test_quantity_monotonic_across_tiers() {
    let mut previous = 0;
    for qty in QTY_PROBES {
        let input = LeadScoreInput {
            qty,
            ..Default::default()
        };
        let points = score_breakdown(&input).quantity;
        assert!(points >= previous, "qty {} gave {} < {}", qty, points, previous);
        if qty >= 250 {
            assert_eq!(points, 24);
        }
        previous = points;
    }
}

/// Score stays in range for every combination of signals
#[test]
fn test_score_always_in_range() {
    let brands = ["", "microsoft", "SEQRITE", "Cisco", "other"];
    let timelines = ["", "today", "this week", "next month", "someday"];
    let texts = ["", "google ads bark", "enterprise security", "Mohali", "x"];

    for brand in brands {
        for timeline in timelines {
            for text in texts {
                for qty in QTY_PROBES {
                    let input = LeadScoreInput {
                        brand,
                        qty,
                        timeline,
                        source: text,
                        category: text,
                        city: text,
                    };
                    assert!(score(&input) <= 100);
                }
            }
        }
    }
}

/// Priority and band share cut points at every score
#[test]
fn test_priority_matches_band() {
    for s in 0..=100 {
        let expected = match classify_priority(s) {
            Priority::Hot => ScoreBand::Hot,
            Priority::Warm => ScoreBand::Warm,
            Priority::Cold => ScoreBand::Cold,
        };
        assert_eq!(score_band(s), expected, "score {}", s);
        assert_eq!(
            classify_priority(s).as_str().to_lowercase(),
            score_band(s).as_str()
        );
    }
    assert_eq!(classify_priority(79), Priority::Warm);
    assert_eq!(classify_priority(80), Priority::Hot);
    assert_eq!(classify_priority(44), Priority::Cold);
    assert_eq!(classify_priority(45), Priority::Warm);
}

#[test]
fn test_worked_examples() {
    let hot = LeadScoreInput {
        brand: "Microsoft",
        qty: 120,
        timeline: "This Week",
        source: "google ads",
        category: "Enterprise",
        city: "Chandigarh",
    };
    assert_eq!(score(&hot), 93);
    assert_eq!(classify_priority(score(&hot)), Priority::Hot);

    let cold = LeadScoreInput {
        brand: "Other",
        ..Default::default()
    };
    assert_eq!(score(&cold), 33);
    assert_eq!(classify_priority(score(&cold)), Priority::Cold);
}

#[test]
fn test_infer_scope_total() {
    let roster = Roster::default();
    let owners = [None, Some(""), Some("Rimpy"), Some("Nidhi"), Some("Gurpreet"), Some("Zed")];
    let texts = ["", "  ", "reseller", "SOC audit", "on-site", "quote please"];

    for owner in owners {
        for text in texts {
            let lead = ScopeFields {
                assigned_to: owner,
                notes: text,
                ..Default::default()
            };
            let scope = infer_scope(&lead, &roster);
            assert!(matches!(
                scope,
                CrmScope::Sales
                    | CrmScope::Dealer
                    | CrmScope::Enterprise
                    | CrmScope::LocalOps
                    | CrmScope::Unscoped
            ));
        }
    }

    let owned = ScopeFields {
        assigned_to: Some("Rimpy"),
        ..Default::default()
    };
    assert_eq!(infer_scope(&owned, &roster), CrmScope::Dealer);
    let onsite = ScopeFields {
        notes: "need onsite installation support",
        ..Default::default()
    };
    assert_eq!(infer_scope(&onsite, &roster), CrmScope::LocalOps);
    assert_eq!(infer_scope(&ScopeFields::default(), &roster), CrmScope::Unscoped);
}

#[test]
fn test_management_can_access_empty_lead() {
    let roster = Roster::default();
    let session = StaffSession::management("owner");
    assert!(can_access(&session, &ScopeFields::default(), &roster));
}

#[test]
fn test_sales_without_assignee_never_accesses() {
    let roster = Roster::default();
    let session = StaffSession::with_role("temp", CrmRole::Sales, None);
    for owner in [None, Some(""), Some("Nidhi"), Some("Rimpy")] {
        for notes in ["", "reseller", "enterprise"] {
            let lead = ScopeFields {
                assigned_to: owner,
                notes,
                ..Default::default()
            };
            assert!(!can_access(&session, &lead, &roster));
        }
    }
}

#[test]
fn test_dealer_session_scenarios() {
    let roster = Roster::default();
    let session = StaffSession::with_role("dealer-desk", CrmRole::Dealer, None);

    let rimpy = ScopeFields {
        assigned_to: Some("Rimpy"),
        ..Default::default()
    };
    assert!(can_access(&session, &rimpy, &roster));

    let reseller = ScopeFields {
        assigned_to: Some("Nidhi"),
        notes: "looking to become a reseller",
        ..Default::default()
    };
    assert!(can_access(&session, &reseller, &roster));
}

#[test]
fn test_priority_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&Priority::Hot).unwrap(), "\"HOT\"");
    assert_eq!(serde_json::to_string(&ScoreBand::Warm).unwrap(), "\"warm\"");
}
