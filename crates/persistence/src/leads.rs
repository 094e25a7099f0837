//! Lead storage
//!
//! Leads are never deleted. Updates run as a closure under the store's write
//! lock so concurrent edits to one lead cannot interleave.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use leaddesk_core::Lead;

use crate::PersistenceError;

/// In-place edit applied by [`LeadStore::update_lead`]
pub type LeadUpdate<'a> = Box<dyn FnOnce(&mut Lead) + Send + 'a>;

/// Lead store trait
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// All leads, newest first
    async fn list_leads(&self) -> Result<Vec<Lead>, PersistenceError>;

    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, PersistenceError>;

    async fn insert_lead(&self, lead: &Lead) -> Result<(), PersistenceError>;

    /// Apply `update` to the stored lead and return the result
    async fn update_lead(&self, id: &str, update: LeadUpdate<'_>)
        -> Result<Lead, PersistenceError>;

    async fn count(&self) -> Result<usize, PersistenceError>;
}

/// HashMap-backed lead store
///
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<HashMap<String, Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn list_leads(&self) -> Result<Vec<Lead>, PersistenceError> {
        let mut leads: Vec<Lead> = self.leads.read().values().cloned().collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(leads)
    }

    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, PersistenceError> {
        Ok(self.leads.read().get(id).cloned())
    }

    async fn insert_lead(&self, lead: &Lead) -> Result<(), PersistenceError> {
        let mut leads = self.leads.write();
        if leads.contains_key(&lead.id) {
            return Err(PersistenceError::Conflict(lead.id.clone()));
        }
        leads.insert(lead.id.clone(), lead.clone());
        tracing::debug!(lead_id = %lead.id, "Lead stored");
        Ok(())
    }

    async fn update_lead(
        &self,
        id: &str,
        update: LeadUpdate<'_>,
    ) -> Result<Lead, PersistenceError> {
        let mut leads = self.leads.write();
        let lead = leads
            .get_mut(id)
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;
        update(lead);
        Ok(lead.clone())
    }

    async fn count(&self) -> Result<usize, PersistenceError> {
        Ok(self.leads.read().len())
    }
}
