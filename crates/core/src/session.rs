//! Staff session context used to authorize lead visibility

use serde::{Deserialize, Serialize};

/// Tiered CRM role carried by a staff session
///
/// Unknown labels are preserved in `Other` so the access layer can apply the
/// strict fallback instead of rejecting the session outright.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CrmRole {
    SuperAdmin,
    Admin,
    Sales,
    Dealer,
    Enterprise,
    LocalOps,
    Other(String),
}

impl CrmRole {
    /// Parse a role label (case-insensitive, spaces and dashes read as `_`)
    pub fn parse(s: &str) -> Self {
        let normalized = s.trim().to_ascii_uppercase().replace(&[' ', '-'][..], "_");
        match normalized.as_str() {
            "SUPER_ADMIN" | "SUPERADMIN" => Self::SuperAdmin,
            "ADMIN" => Self::Admin,
            "SALES" => Self::Sales,
            "DEALER" => Self::Dealer,
            "ENTERPRISE" => Self::Enterprise,
            "LOCAL_OPS" => Self::LocalOps,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Sales => "SALES",
            Self::Dealer => "DEALER",
            Self::Enterprise => "ENTERPRISE",
            Self::LocalOps => "LOCAL_OPS",
            Self::Other(label) => label,
        }
    }

    /// Whether the role sees every lead
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl Default for CrmRole {
    fn default() -> Self {
        Self::Sales
    }
}

impl From<String> for CrmRole {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<CrmRole> for String {
    fn from(role: CrmRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for CrmRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated staff actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSession {
    pub username: String,
    /// Management sessions are unrestricted
    pub is_management: bool,
    pub crm_role: CrmRole,
    /// Agent name whose queue this session owns exclusively
    pub assignee: Option<String>,
}

impl StaffSession {
    pub fn management(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_management: true,
            crm_role: CrmRole::SuperAdmin,
            assignee: None,
        }
    }

    pub fn with_role(
        username: impl Into<String>,
        crm_role: CrmRole,
        assignee: Option<&str>,
    ) -> Self {
        Self {
            username: username.into(),
            is_management: false,
            crm_role,
            assignee: assignee.map(str::to_string),
        }
    }

    /// Management sessions and admin roles see every lead
    pub fn is_unrestricted(&self) -> bool {
        self.is_management || self.crm_role.is_unrestricted()
    }

    /// Trimmed assignee, `None` when absent or blank
    pub fn assignee(&self) -> Option<&str> {
        self.assignee
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(CrmRole::parse("super admin"), CrmRole::SuperAdmin);
        assert_eq!(CrmRole::parse("local-ops"), CrmRole::LocalOps);
        assert_eq!(CrmRole::parse(" dealer "), CrmRole::Dealer);
        assert_eq!(CrmRole::parse("auditor"), CrmRole::Other("AUDITOR".to_string()));
    }

    #[test]
    fn test_role_round_trips_through_string() {
        let json = serde_json::to_string(&CrmRole::LocalOps).unwrap();
        assert_eq!(json, "\"LOCAL_OPS\"");
        let role: CrmRole = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, CrmRole::Other("VIEWER".to_string()));
    }

    #[test]
    fn test_unrestricted_sessions() {
        assert!(StaffSession::management("owner").is_unrestricted());
        assert!(StaffSession::with_role("ops", CrmRole::Admin, None).is_unrestricted());
        assert!(StaffSession::with_role("root", CrmRole::SuperAdmin, None).is_unrestricted());
        let sales = StaffSession::with_role("nidhi", CrmRole::Sales, Some("Nidhi"));
        assert!(!sales.is_unrestricted());
        assert!(!StaffSession::with_role("desk", CrmRole::Dealer, None).is_unrestricted());
    }

    #[test]
    fn test_blank_assignee_is_none() {
        let session = StaffSession::with_role("nidhi", CrmRole::Sales, Some("  "));
        assert_eq!(session.assignee(), None);
    }
}
