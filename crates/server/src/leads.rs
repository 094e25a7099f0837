//! Lead endpoints
//!
//! The capture form is public. Everything else runs with the signed-in
//! [`StaffSession`] and filters or rejects leads through `can_access`.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use leaddesk_core::{
    AuditEvent, AuditEventType, CrmScope, Lead, LeadPatch, LeadStatus, NewLead, Priority,
    ScoreBand, StaffSession,
};
use leaddesk_persistence::{format_lead_alert, AuditQuery};
use leaddesk_rules::{
    can_access, score_band, score_breakdown, source_report, visible_leads, ScoreBreakdown,
    SourceReport,
};

use crate::metrics::{record_access_denied, record_lead_captured, record_rate_limited};
use crate::state::AppState;
use crate::ServerError;

/// Capture response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub id: String,
    pub score: u32,
    pub priority: Priority,
    pub band: ScoreBand,
}

/// POST /api/capture
pub async fn capture(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(form): Json<NewLead>,
) -> Result<(StatusCode, Json<CaptureResponse>), ServerError> {
    let forwarded_for = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok());
    let ip = state
        .rate_limiter
        .client_key(connect_info.map(|ConnectInfo(addr)| addr.ip()), forwarded_for);
    if let Err(limit) = state.rate_limiter.check(ip) {
        record_rate_limited();
        tracing::warn!(client = %ip, "Capture rate limited");
        return Err(limit.into());
    }

    validate_form(&form)?;

    let lead = state.intake.process(form);
    state.leads.insert_lead(&lead).await?;
    record_lead_captured(lead.priority);

    state
        .audit
        .append(AuditEvent::new(
            AuditEventType::LeadCaptured,
            Some(&lead.id),
            "public",
            serde_json::json!({
                "score": lead.score,
                "priority": lead.priority,
                "source": lead.source_bucket,
                "scope": lead.scope,
                "assignedTo": lead.assigned_to,
            }),
        ))
        .await?;

    notify_if_due(&state, &lead).await;

    Ok((
        StatusCode::CREATED,
        Json(CaptureResponse {
            id: lead.id,
            score: lead.score,
            priority: lead.priority,
            band: score_band(lead.score),
        }),
    ))
}

fn validate_form(form: &NewLead) -> leaddesk_core::Result<()> {
    if form.name.trim().is_empty() {
        return Err(leaddesk_core::Error::invalid("name", "is required"));
    }
    if form.phone.trim().is_empty() && form.email.trim().is_empty() {
        return Err(leaddesk_core::Error::invalid("phone", "or email is required"));
    }
    Ok(())
}

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::Cold => 0,
        Priority::Warm => 1,
        Priority::Hot => 2,
    }
}

/// Alert the sales desk; failures are audited and never fail the capture
async fn notify_if_due(state: &AppState, lead: &Lead) {
    let settings = &state.config.notifications;
    if !settings.enabled || priority_rank(lead.priority) < priority_rank(settings.notify_on) {
        return;
    }

    let body = format_lead_alert(lead);
    for recipient in &settings.recipients {
        let (event_type, details) = match state.notifier.send(recipient, &body, Some(&lead.id)).await
        {
            Ok(result) => (
                AuditEventType::NotificationSent,
                serde_json::json!({
                    "recipient": recipient,
                    "channel": result.channel,
                    "messageId": result.message_id,
                }),
            ),
            Err(e) => {
                tracing::warn!(lead_id = %lead.id, recipient = %recipient, error = %e, "Lead notification failed");
                (
                    AuditEventType::NotificationFailed,
                    serde_json::json!({ "recipient": recipient, "error": e.to_string() }),
                )
            },
        };

        let event = AuditEvent::new(event_type, Some(&lead.id), "system", details);
        if let Err(e) = state.audit.append(event).await {
            tracing::error!(lead_id = %lead.id, error = %e, "Failed to audit notification");
        }
    }
}

/// List filters
#[derive(Debug, Default, Deserialize)]
pub struct LeadFilter {
    pub priority: Option<String>,
    pub status: Option<String>,
    pub band: Option<String>,
    pub scope: Option<String>,
}

struct ParsedFilter {
    priority: Option<Priority>,
    status: Option<LeadStatus>,
    band: Option<ScoreBand>,
    scope: Option<CrmScope>,
}

impl LeadFilter {
    fn parse(&self) -> Result<ParsedFilter, ServerError> {
        fn parse_with<T>(
            field: &str,
            raw: &Option<String>,
            parse: impl Fn(&str) -> Option<T>,
        ) -> Result<Option<T>, ServerError> {
            match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                None => Ok(None),
                Some(value) => parse(value).map(Some).ok_or_else(|| {
                    ServerError::InvalidRequest(format!("Unknown {}: {}", field, value))
                }),
            }
        }

        Ok(ParsedFilter {
            priority: parse_with("priority", &self.priority, Priority::parse)?,
            status: parse_with("status", &self.status, LeadStatus::parse)?,
            band: parse_with("band", &self.band, ScoreBand::parse)?,
            scope: parse_with("scope", &self.scope, CrmScope::parse)?,
        })
    }
}

impl ParsedFilter {
    fn matches(&self, lead: &Lead) -> bool {
        self.priority.map_or(true, |p| lead.priority == p)
            && self.status.map_or(true, |s| lead.status == s)
            && self.band.map_or(true, |b| score_band(lead.score) == b)
            && self.scope.map_or(true, |s| lead.scope == s)
    }
}

/// GET /api/leads
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let filter = filter.parse()?;
    let all = state.leads.list_leads().await?;
    let leads: Vec<&Lead> = visible_leads(&session, &all, state.roster())
        .into_iter()
        .filter(|lead| filter.matches(lead))
        .collect();

    Ok(Json(serde_json::json!({
        "leads": leads,
        "count": leads.len(),
    })))
}

/// Lead detail response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    pub lead: Lead,
    pub band: ScoreBand,
    pub breakdown: ScoreBreakdown,
}

impl From<Lead> for LeadDetail {
    fn from(lead: Lead) -> Self {
        let breakdown = score_breakdown(&lead.score_input());
        Self {
            band: score_band(lead.score),
            breakdown,
            lead,
        }
    }
}

/// Fetch a lead the session may see
async fn accessible_lead(
    state: &AppState,
    session: &StaffSession,
    id: &str,
    route: &'static str,
) -> Result<Lead, ServerError> {
    let lead = state
        .leads
        .get_lead(id)
        .await?
        .ok_or_else(|| leaddesk_core::Error::NotFound(format!("lead {}", id)))?;

    if !can_access(session, &lead.scope_fields(), state.roster()) {
        record_access_denied(route);
        tracing::warn!(lead_id = %id, username = %session.username, route, "Lead access denied");
        return Err(leaddesk_core::Error::Forbidden {
            lead_id: id.to_string(),
            actor: session.username.clone(),
        }
        .into());
    }
    Ok(lead)
}

/// GET /api/leads/:id
pub async fn get_lead(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(id): Path<String>,
) -> Result<Json<LeadDetail>, ServerError> {
    let lead = accessible_lead(&state, &session, &id, "lead_detail").await?;
    Ok(Json(lead.into()))
}

/// PATCH /api/leads/:id
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(id): Path<String>,
    Json(patch): Json<LeadPatch>,
) -> Result<Json<LeadDetail>, ServerError> {
    accessible_lead(&state, &session, &id, "lead_update").await?;

    let intake = state.intake.clone();
    let mut changed = Vec::new();
    let changed_ref = &mut changed;
    let lead = state
        .leads
        .update_lead(
            &id,
            Box::new(move |lead: &mut Lead| {
                *changed_ref = lead.apply_patch(patch, Utc::now());
                intake.refresh(lead);
            }),
        )
        .await?;

    if !changed.is_empty() {
        tracing::info!(
            lead_id = %lead.id,
            username = %session.username,
            changed = ?changed,
            score = lead.score,
            priority = lead.priority.as_str(),
            "Lead updated"
        );
        state
            .audit
            .append(AuditEvent::new(
                AuditEventType::LeadUpdated,
                Some(&lead.id),
                &session.username,
                serde_json::json!({
                    "changed": changed,
                    "status": lead.status,
                    "assignedTo": lead.assigned_to,
                    "score": lead.score,
                    "priority": lead.priority,
                }),
            ))
            .await?;
    }

    Ok(Json(lead.into()))
}

/// GET /api/leads/export
pub async fn export_leads(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<Vec<Lead>>, ServerError> {
    let all = state.leads.list_leads().await?;
    let rows: Vec<Lead> = visible_leads(&session, &all, state.roster())
        .into_iter()
        .cloned()
        .collect();

    state
        .audit
        .append(AuditEvent::new(
            AuditEventType::LeadExported,
            None,
            &session.username,
            serde_json::json!({ "count": rows.len() }),
        ))
        .await?;

    Ok(Json(rows))
}

/// GET /api/reports/by-source
pub async fn source_breakdown(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<SourceReport>, ServerError> {
    let all = state.leads.list_leads().await?;
    let visible = visible_leads(&session, &all, state.roster());
    Ok(Json(source_report(visible)))
}

/// Event filters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub lead_id: Option<String>,
    pub limit: Option<usize>,
}

const DEFAULT_EVENT_LIMIT: usize = 200;

/// GET /api/events
///
/// Events tied to a lead follow that lead's visibility. Events without a
/// lead (logins, exports) are shown to unrestricted sessions only.
pub async fn list_events(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let query = AuditQuery {
        lead_id: filter.lead_id,
        ..Default::default()
    };
    let events = state.audit.query(&query).await?;

    let leads: HashMap<String, Lead> = state
        .leads
        .list_leads()
        .await?
        .into_iter()
        .map(|lead| (lead.id.clone(), lead))
        .collect();

    let limit = filter.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let visible: Vec<_> = events
        .into_iter()
        .filter(|event| match &event.lead_id {
            Some(id) => leads
                .get(id)
                .is_some_and(|lead| can_access(&session, &lead.scope_fields(), state.roster())),
            None => session.is_unrestricted(),
        })
        .take(limit)
        .collect();

    Ok(Json(serde_json::json!({
        "events": visible,
        "count": visible.len(),
    })))
}
