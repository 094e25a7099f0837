//! Static roster entries for the human agents who own leads

use serde::{Deserialize, Serialize};

use crate::lead::CrmScope;

/// Job function of a roster agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    CallingAgent,
    SalesAgent,
    TechSupport,
}

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Name leads are assigned under; matched exactly
    pub name: String,
    /// Display label for the admin console
    pub label: String,
    pub role: AgentRole,
    /// Scope whose queue this agent's name is reserved for
    #[serde(default)]
    pub scope: Option<CrmScope>,
}

impl Agent {
    pub fn new(name: &str, label: &str, role: AgentRole, scope: Option<CrmScope>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            role,
            scope,
        }
    }
}
