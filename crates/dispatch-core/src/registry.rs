use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::DispatchError, ids::ResponderId, model::ResponderStatus};

/// Authoritative availability map. Ordered by id so iteration, and therefore
/// deterministic selection policies, are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponderRegistry {
    entries: BTreeMap<ResponderId, ResponderStatus>,
}

impl ResponderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed responder starts `available`. Duplicates collapse.
    pub fn with_responders<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ResponderId>,
    {
        let mut registry = Self::new();
        for id in ids {
            registry.register(id);
        }
        registry
    }

    /// Adds a new `available` responder. Returns false if the id was already registered.
    pub fn register(&mut self, id: impl Into<ResponderId>) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, ResponderStatus::Available);
        true
    }

    pub fn status(&self, id: &ResponderId) -> Option<ResponderStatus> {
        self.entries.get(id).copied()
    }

    pub fn set_status(&mut self, id: &ResponderId, status: ResponderStatus) -> Result<(), DispatchError> {
        let slot = self
            .entries
            .get_mut(id)
            .ok_or_else(|| DispatchError::UnknownResponder(id.clone()))?;
        *slot = status;
        info!(responder = %id, status = %status, "responder {} now {}", id, status);
        Ok(())
    }

    pub fn available_ids(&self) -> BTreeSet<ResponderId> {
        self.ids_with(ResponderStatus::Available)
    }

    pub fn busy_ids(&self) -> BTreeSet<ResponderId> {
        self.ids_with(ResponderStatus::Busy)
    }

    pub fn all_available(&self) -> bool {
        self.entries.values().all(|s| *s == ResponderStatus::Available)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResponderId, ResponderStatus)> {
        self.entries.iter().map(|(id, s)| (id, *s))
    }

    fn ids_with(&self, status: ResponderStatus) -> BTreeSet<ResponderId> {
        self.entries
            .iter()
            .filter(|(_, s)| **s == status)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
