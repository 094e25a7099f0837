//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;

use leaddesk_core::{CrmRole, Priority, StaffSession};

use crate::{ConfigError, CrmConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Staff accounts allowed to sign in to the admin console
    #[serde(default)]
    pub staff: Vec<StaffAccount>,

    /// Roster, assignment pools and picker
    #[serde(default)]
    pub crm: CrmConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_staff()?;
        self.crm.validate()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        let rate_limit = &server.rate_limit;
        if rate_limit.enabled {
            if rate_limit.max_requests == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.max_requests".to_string(),
                    message: "Must be at least 1 when rate limiting is enabled".to_string(),
                });
            }

            if rate_limit.window_seconds == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.window_seconds".to_string(),
                    message: "Window must be at least 1 second".to_string(),
                });
            }
        }

        if server.auth.session_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.auth.session_ttl_minutes".to_string(),
                message: format!("Must be positive, got {}", server.auth.session_ttl_minutes),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block the admin console."
            );
        }

        Ok(())
    }

    fn validate_staff(&self) -> Result<(), ConfigError> {
        if self.staff.is_empty() {
            if self.environment.is_strict() {
                return Err(ConfigError::MissingField("staff".to_string()));
            }
            tracing::warn!("No staff accounts configured; the admin console is unreachable");
        }

        let mut usernames = HashSet::new();
        for account in &self.staff {
            if account.access_key.len() < MIN_ACCESS_KEY_LEN {
                return Err(ConfigError::InvalidValue {
                    field: format!("staff.{}.access_key", account.username),
                    message: format!("Must be at least {} characters", MIN_ACCESS_KEY_LEN),
                });
            }
            if !usernames.insert(account.username.to_ascii_lowercase()) {
                return Err(ConfigError::InvalidValue {
                    field: "staff.username".to_string(),
                    message: format!("Duplicate username: {}", account.username),
                });
            }
            if let CrmRole::Other(label) = &account.crm_role {
                tracing::warn!(
                    username = %account.username,
                    role = %label,
                    "Unrecognized CRM role; access falls back to assignee matching"
                );
            }
        }

        Ok(())
    }

    /// Find a staff account by username (case-insensitive)
    pub fn staff_account(&self, username: &str) -> Option<&StaffAccount> {
        self.staff
            .iter()
            .find(|a| a.username.eq_ignore_ascii_case(username.trim()))
    }
}

const MIN_ACCESS_KEY_LEN: usize = 12;

/// Staff account
#[derive(Clone, Serialize, Deserialize)]
pub struct StaffAccount {
    pub username: String,
    /// Shared secret presented at login
    pub access_key: String,
    #[serde(default)]
    pub is_management: bool,
    #[serde(default)]
    pub crm_role: CrmRole,
    /// Agent name whose queue this account owns
    #[serde(default)]
    pub assignee: Option<String>,
}

impl StaffAccount {
    /// Session context for this account
    pub fn to_session(&self) -> StaffSession {
        StaffSession {
            username: self.username.clone(),
            is_management: self.is_management,
            crm_role: self.crm_role.clone(),
            assignee: self.assignee.clone(),
        }
    }
}

impl std::fmt::Debug for StaffAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffAccount")
            .field("username", &self.username)
            .field("access_key", &"<redacted>")
            .field("is_management", &self.is_management)
            .field("crm_role", &self.crm_role)
            .field("assignee", &self.assignee)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Rate limiting for the public capture endpoint
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            // Empty by default; configure the admin console origin explicitly
            cors_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Session authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime after login
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,

    /// Paths that bypass authentication
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_session_ttl_minutes() -> i64 {
    12 * 60
}

fn default_public_paths() -> Vec<String> {
    vec![
        "/health".to_string(),
        "/metrics".to_string(),
        "/api/capture".to_string(),
        "/api/auth/login".to_string(),
    ]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: default_session_ttl_minutes(),
            public_paths: default_public_paths(),
        }
    }
}

/// Per-IP fixed-window rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests allowed per client IP per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,

    /// Reverse proxies whose `X-Forwarded-For` header is honoured.
    /// Requests from any other peer are keyed on the socket address.
    #[serde(default)]
    pub trusted_proxies: Vec<IpAddr>,
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_seconds() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
            trusted_proxies: Vec::new(),
        }
    }
}

/// Outbound notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Notify when a captured lead lands at this priority
    #[serde(default = "default_notify_priority")]
    pub notify_on: Priority,

    /// WhatsApp numbers or email addresses of the sales desk
    #[serde(default)]
    pub recipients: Vec<String>,
}

fn default_notify_priority() -> Priority {
    Priority::Hot
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notify_on: default_notify_priority(),
            recipients: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (LEADDESK__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("LEADDESK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
