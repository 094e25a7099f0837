//! Lead record and its classification vocabulary
//!
//! A `Lead` is created once at capture time and then mutated by staff and by
//! the rules engine. Derived fields (`score`, `priority`, `source_bucket`,
//! `scope`) are never written by hand; they are recomputed from the current
//! inputs after every change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow status of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[default]
    New,
    InProgress,
    Quoted,
    Won,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Quoted => "QUOTED",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }

    /// Parse a status label from any surface (admin UI, CRM API, imports)
    ///
    /// Case-insensitive; `CONTACTED` is accepted as an alias of `IN_PROGRESS`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace(&[' ', '-'][..], "_").as_str() {
            "NEW" => Some(Self::New),
            "IN_PROGRESS" | "CONTACTED" => Some(Self::InProgress),
            "QUOTED" => Some(Self::Quoted),
            "WON" => Some(Self::Won),
            "LOST" => Some(Self::Lost),
            _ => None,
        }
    }
}

/// Coarse priority derived from the lead score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Hot,
    Warm,
    #[default]
    Cold,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Warm => "WARM",
            Self::Cold => "COLD",
        }
    }

    /// Case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        ScoreBand::parse(s).map(Into::into)
    }
}

/// Lowercase display band, cut at the same points as [`Priority`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Hot,
    Warm,
    #[default]
    Cold,
}

impl ScoreBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "warm" => Some(Self::Warm),
            "cold" => Some(Self::Cold),
            _ => None,
        }
    }
}

impl From<Priority> for ScoreBand {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Hot => Self::Hot,
            Priority::Warm => Self::Warm,
            Priority::Cold => Self::Cold,
        }
    }
}

/// Coarse ownership bucket used to scope lead visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrmScope {
    Sales,
    Dealer,
    Enterprise,
    LocalOps,
    #[default]
    Unscoped,
}

impl CrmScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "SALES",
            Self::Dealer => "DEALER",
            Self::Enterprise => "ENTERPRISE",
            Self::LocalOps => "LOCAL_OPS",
            Self::Unscoped => "UNSCOPED",
        }
    }

    /// Case-insensitive; spaces and dashes read as `_`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace(&[' ', '-'][..], "_").as_str() {
            "SALES" => Some(Self::Sales),
            "DEALER" => Some(Self::Dealer),
            "ENTERPRISE" => Some(Self::Enterprise),
            "LOCAL_OPS" => Some(Self::LocalOps),
            "UNSCOPED" => Some(Self::Unscoped),
            _ => None,
        }
    }
}

impl From<ScoreBand> for Priority {
    fn from(band: ScoreBand) -> Self {
        match band {
            ScoreBand::Hot => Self::Hot,
            ScoreBand::Warm => Self::Warm,
            ScoreBand::Cold => Self::Cold,
        }
    }
}

/// Acquisition channel bucket used for "by source" reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SourceBucket {
    #[serde(rename = "Google Ads")]
    GoogleAds,
    #[serde(rename = "Bark")]
    Bark,
    #[serde(rename = "WhatsApp")]
    WhatsApp,
    #[serde(rename = "Social")]
    Social,
    #[serde(rename = "Organic Search")]
    OrganicSearch,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Referral")]
    Referral,
    #[serde(rename = "Direct")]
    Direct,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl SourceBucket {
    /// Every bucket, in report order
    pub const ALL: [SourceBucket; 9] = [
        Self::GoogleAds,
        Self::Bark,
        Self::WhatsApp,
        Self::Social,
        Self::OrganicSearch,
        Self::Email,
        Self::Referral,
        Self::Direct,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::GoogleAds => "Google Ads",
            Self::Bark => "Bark",
            Self::WhatsApp => "WhatsApp",
            Self::Social => "Social",
            Self::OrganicSearch => "Organic Search",
            Self::Email => "Email",
            Self::Referral => "Referral",
            Self::Direct => "Direct",
            Self::Other => "Other",
        }
    }
}

/// Inbound lead as submitted by a capture form or the CRM API
///
/// Every field is optional on the wire. Absent text becomes an empty string
/// and an absent quantity becomes 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub brand: String,
    #[serde(alias = "requirement")]
    pub category: String,
    #[serde(alias = "quantity")]
    pub qty: i64,
    pub city: String,
    pub timeline: String,
    pub source: String,
    pub campaign: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub referrer: String,
    pub notes: String,
    pub assigned_to: Option<String>,
}

/// Lead record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,

    // Contact
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: String,

    // Classification inputs
    pub brand: String,
    pub category: String,
    pub qty: u32,
    pub city: String,
    pub timeline: String,
    pub source: String,
    pub campaign: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub referrer: String,
    pub notes: String,

    // Workflow
    pub status: LeadStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub first_contact_at: Option<DateTime<Utc>>,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub next_follow_up_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    // Derived
    pub score: u32,
    pub priority: Priority,
    pub source_bucket: SourceBucket,
    pub scope: CrmScope,
}

impl Lead {
    /// Build a lead from a normalized capture
    ///
    /// Derived fields hold placeholders until the rules engine recomputes them.
    pub fn new(id: impl Into<String>, input: NewLead, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: clean(&input.name),
            phone: clean(&input.phone),
            email: clean(&input.email),
            company: clean(&input.company),
            brand: clean(&input.brand),
            category: clean(&input.category),
            qty: input.qty.clamp(0, u32::MAX as i64) as u32,
            city: clean(&input.city),
            timeline: clean(&input.timeline),
            source: clean(&input.source),
            campaign: clean(&input.campaign),
            utm_source: clean(&input.utm_source),
            utm_medium: clean(&input.utm_medium),
            utm_campaign: clean(&input.utm_campaign),
            referrer: clean(&input.referrer),
            notes: clean(&input.notes),
            status: LeadStatus::New,
            assigned_to: input.assigned_to.as_deref().and_then(clean_opt),
            created_at,
            first_contact_at: None,
            last_contacted_at: None,
            next_follow_up_at: None,
            updated_at: created_at,
            score: 0,
            priority: Priority::Cold,
            source_bucket: SourceBucket::Other,
            scope: CrmScope::Unscoped,
        }
    }

    /// Scoring view of this lead
    ///
    /// The source signal reads `source`, falling back to `utm_source` when the
    /// form left `source` blank.
    pub fn score_input(&self) -> LeadScoreInput<'_> {
        let source = if self.source.is_empty() {
            self.utm_source.as_str()
        } else {
            self.source.as_str()
        };
        LeadScoreInput {
            brand: &self.brand,
            qty: self.qty,
            timeline: &self.timeline,
            source,
            category: &self.category,
            city: &self.city,
        }
    }

    /// Fields used for scope inference and access decisions
    pub fn scope_fields(&self) -> ScopeFields<'_> {
        ScopeFields {
            assigned_to: self.assigned_to.as_deref(),
            source: &self.source,
            campaign: &self.campaign,
            requirement: &self.category,
            notes: &self.notes,
        }
    }

    /// Fields used for acquisition-channel bucketing
    pub fn source_fields(&self) -> SourceFields<'_> {
        SourceFields {
            source: &self.source,
            campaign: &self.campaign,
            utm_source: &self.utm_source,
            utm_medium: &self.utm_medium,
            utm_campaign: &self.utm_campaign,
            referrer: &self.referrer,
        }
    }

    /// Apply a staff edit
    ///
    /// Returns the names of the fields that changed. Derived fields are left
    /// untouched; callers recompute them afterwards.
    pub fn apply_patch(&mut self, patch: LeadPatch, now: DateTime<Utc>) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(status) = patch.status {
            if status != self.status {
                if self.status == LeadStatus::New && self.first_contact_at.is_none() {
                    self.first_contact_at = Some(now);
                }
                self.last_contacted_at = Some(now);
                self.status = status;
                changed.push("status");
            }
        }

        if let Some(assignee) = patch.assigned_to {
            let assignee = clean_opt(&assignee);
            if assignee != self.assigned_to {
                self.assigned_to = assignee;
                changed.push("assignedTo");
            }
        }

        if let Some(at) = patch.next_follow_up_at {
            self.next_follow_up_at = Some(at);
            changed.push("nextFollowUpAt");
        }

        if let Some(qty) = patch.qty {
            if qty != self.qty {
                self.qty = qty;
                changed.push("qty");
            }
        }

        let text_fields = [
            (patch.notes, &mut self.notes, "notes"),
            (patch.brand, &mut self.brand, "brand"),
            (patch.category, &mut self.category, "category"),
            (patch.city, &mut self.city, "city"),
            (patch.timeline, &mut self.timeline, "timeline"),
        ];
        for (value, field, name) in text_fields {
            if let Some(value) = value {
                let value = clean(&value);
                if *field != value {
                    *field = value;
                    changed.push(name);
                }
            }
        }

        if !changed.is_empty() {
            self.updated_at = now;
        }
        changed
    }
}

/// Partial update submitted from the admin console
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
    pub status: Option<LeadStatus>,
    /// An empty string clears the assignee
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub next_follow_up_at: Option<DateTime<Utc>>,
    pub brand: Option<String>,
    #[serde(alias = "requirement")]
    pub category: Option<String>,
    #[serde(alias = "quantity")]
    pub qty: Option<u32>,
    pub city: Option<String>,
    pub timeline: Option<String>,
}

/// Scoring inputs; empty strings carry no signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadScoreInput<'a> {
    pub brand: &'a str,
    pub qty: u32,
    pub timeline: &'a str,
    pub source: &'a str,
    pub category: &'a str,
    pub city: &'a str,
}

/// Scope inference inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFields<'a> {
    pub assigned_to: Option<&'a str>,
    pub source: &'a str,
    pub campaign: &'a str,
    pub requirement: &'a str,
    pub notes: &'a str,
}

/// Acquisition channel inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceFields<'a> {
    pub source: &'a str,
    pub campaign: &'a str,
    pub utm_source: &'a str,
    pub utm_medium: &'a str,
    pub utm_campaign: &'a str,
    pub referrer: &'a str,
}

fn clean(s: &str) -> String {
    s.trim().to_string()
}

fn clean_opt(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
