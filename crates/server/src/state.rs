//! Application State
//!
//! Shared state across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use leaddesk_config::{Roster, Settings};
use leaddesk_persistence::{AuditLog, LeadStore, Notifier, PersistenceLayer, SimulatedNotifier};
use leaddesk_rules::LeadIntake;

use crate::auth::SessionManager;
use crate::rate_limit::RateLimiter;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Scoring, classification and owner suggestion at capture
    pub intake: Arc<LeadIntake>,
    pub leads: Arc<dyn LeadStore>,
    pub audit: Arc<dyn AuditLog>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: Arc<SessionManager>,
    /// Limits the public capture form per client IP
    pub rate_limiter: Arc<RateLimiter>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Application state with in-memory stores and the simulated notifier
    pub fn new(config: Settings) -> Self {
        Self::with_persistence(
            config,
            PersistenceLayer::in_memory(),
            Arc::new(SimulatedNotifier::new()),
        )
    }

    pub fn with_persistence(
        config: Settings,
        persistence: PersistenceLayer,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            intake: Arc::new(LeadIntake::new(&config.crm)),
            leads: persistence.leads,
            audit: persistence.audit,
            notifier,
            sessions: Arc::new(SessionManager::new(config.server.auth.session_ttl_minutes)),
            rate_limiter: Arc::new(RateLimiter::new(&config.server.rate_limit)),
            metrics: None,
            config: Arc::new(config),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn roster(&self) -> &Roster {
        self.intake.roster()
    }
}
