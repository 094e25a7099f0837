//! Agent roster and assignment pools
//!
//! The roster is static configuration: it names the human agents, reserves
//! some of them for a CRM scope (dealer desk, enterprise desk, local ops,
//! general sales), and lists the pools the intake suggester picks from.
//! It is loaded with the rest of the settings or standalone from a
//! `roster.yaml` file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use leaddesk_core::{Agent, AgentRole, CrmScope};

use crate::ConfigError;

/// Roster of agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub agents: Vec<Agent>,
}

impl Default for Roster {
    fn default() -> Self {
        use AgentRole::*;
        use CrmScope::*;

        Self {
            agents: vec![
                Agent::new("Rimpy", "Rimpy (Dealer Desk)", SalesAgent, Some(Dealer)),
                Agent::new("Harpreet", "Harpreet (Enterprise)", SalesAgent, Some(Enterprise)),
                Agent::new("Gurpreet", "Gurpreet (Field Ops)", TechSupport, Some(LocalOps)),
                Agent::new("Manpreet", "Manpreet (Field Ops)", TechSupport, Some(LocalOps)),
                Agent::new("Nidhi", "Nidhi", CallingAgent, None),
                Agent::new("Simran", "Simran", CallingAgent, Some(Sales)),
                Agent::new("Aman", "Aman", SalesAgent, Some(Sales)),
                Agent::new("Pooja", "Pooja", CallingAgent, None),
                Agent::new("Karan", "Karan", SalesAgent, Some(Sales)),
                Agent::new("Deepak", "Deepak (Support)", TechSupport, None),
            ],
        }
    }
}

impl Roster {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    /// Load a roster from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|_| ConfigError::FileNotFound(path.as_ref().display().to_string()))?;

        let roster: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        roster.validate()?;
        Ok(roster)
    }

    /// Find an agent by exact name
    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Names reserved for a scope, in roster order
    pub fn reserved_for(&self, scope: CrmScope) -> impl Iterator<Item = &str> {
        self.agents
            .iter()
            .filter(move |a| a.scope == Some(scope))
            .map(|a| a.name.as_str())
    }

    /// Whether `name` is one of the names reserved for `scope`
    pub fn is_reserved(&self, scope: CrmScope, name: &str) -> bool {
        self.reserved_for(scope).any(|reserved| reserved == name)
    }

    /// Reject duplicate or blank names
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "crm.roster.agents.name".to_string(),
                    message: "Agent name cannot be empty".to_string(),
                });
            }
            if !seen.insert(agent.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "crm.roster.agents".to_string(),
                    message: format!("Duplicate agent name: {}", agent.name),
                });
            }
        }

        for (scope, expected) in [
            (CrmScope::Dealer, 1),
            (CrmScope::Enterprise, 1),
            (CrmScope::LocalOps, 2),
            (CrmScope::Sales, 3),
        ] {
            let count = self.reserved_for(scope).count();
            if count != expected {
                tracing::warn!(
                    scope = scope.as_str(),
                    count,
                    expected,
                    "Unusual number of reserved names for scope"
                );
            }
        }

        Ok(())
    }
}

/// How the suggester picks within a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    /// Deterministic rotation through the pool
    #[default]
    RoundRobin,
    /// Uniform random pick
    Random,
    /// Wall-clock milliseconds modulo pool size
    Clock,
}

/// Candidate pools for agent suggestion at intake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPools {
    #[serde(default)]
    pub microsoft: Vec<String>,
    #[serde(default)]
    pub seqrite: Vec<String>,
    /// Cisco and networking requirements
    #[serde(default)]
    pub network: Vec<String>,
    /// Fixed owner for support requests
    #[serde(default)]
    pub support: Option<String>,
    #[serde(default)]
    pub general: Vec<String>,
}

impl Default for AssignmentPools {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            microsoft: names(&["Nidhi", "Simran"]),
            seqrite: names(&["Aman", "Pooja"]),
            network: names(&["Karan", "Harpreet"]),
            support: Some("Deepak".to_string()),
            general: names(&["Rimpy", "Gurpreet", "Manpreet"]),
        }
    }
}

impl AssignmentPools {
    fn all_names(&self) -> impl Iterator<Item = &str> {
        self.microsoft
            .iter()
            .chain(&self.seqrite)
            .chain(&self.network)
            .chain(self.support.iter())
            .chain(&self.general)
            .map(String::as_str)
    }

    /// Every pooled name must exist in the roster
    pub fn validate(&self, roster: &Roster) -> Result<(), ConfigError> {
        if let Some(unknown) = self.all_names().find(|name| roster.get(name).is_none()) {
            return Err(ConfigError::InvalidValue {
                field: "crm.pools".to_string(),
                message: format!("Pool references unknown agent: {}", unknown),
            });
        }
        Ok(())
    }
}

/// CRM section of the settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmConfig {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub pools: AssignmentPools,
    #[serde(default)]
    pub picker: PickerKind,
}

impl CrmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.roster.validate()?;
        self.pools.validate(&self.roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_roster_reservations() {
        let roster = Roster::default();
        assert!(roster.is_reserved(CrmScope::Dealer, "Rimpy"));
        assert!(roster.is_reserved(CrmScope::Enterprise, "Harpreet"));
        assert_eq!(roster.reserved_for(CrmScope::LocalOps).count(), 2);
        assert_eq!(roster.reserved_for(CrmScope::Sales).count(), 3);
        assert!(!roster.is_reserved(CrmScope::Dealer, "rimpy"));
    }

    #[test]
    fn test_default_crm_config_is_valid() {
        assert!(CrmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let roster = Roster::new(vec![
            Agent::new("Nidhi", "Nidhi", AgentRole::CallingAgent, None),
            Agent::new("Nidhi", "Nidhi 2", AgentRole::SalesAgent, None),
        ]);
        assert!(roster.validate().is_err());
    }

    #[test]
    fn test_pool_with_unknown_agent_rejected() {
        let mut config = CrmConfig::default();
        config.pools.general.push("Ghost".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_roster_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
agents:
  - name: Rimpy
    label: Dealer Desk
    role: sales_agent
    scope: DEALER
  - name: Deepak
    label: Support
    role: tech_support
"#
        )
        .unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.agents.len(), 2);
        assert!(roster.is_reserved(CrmScope::Dealer, "Rimpy"));
        assert_eq!(roster.get("Deepak").map(|a| a.role), Some(AgentRole::TechSupport));
    }

    #[test]
    fn test_load_missing_roster() {
        let err = Roster::load("/nonexistent/roster.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
