//! Configuration management for LeadDesk
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`LEADDESK__` prefix, `__` separator)
//! - A standalone `roster.yaml` for the agent roster

pub mod roster;
pub mod settings;

pub use roster::{AssignmentPools, CrmConfig, PickerKind, Roster};
pub use settings::{
    load_settings, AuthConfig, NotificationConfig, ObservabilityConfig, RateLimitConfig,
    RuntimeEnvironment, ServerConfig, Settings, StaffAccount,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
