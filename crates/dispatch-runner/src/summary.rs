use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use dispatch_core::{ErrorKind, IncidentId, ResponderId, ResponderRegistry};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ItemError {
    pub kind: ErrorKind,
    pub message: String,
}

/// One report's fate in a batch. Successful items carry the assignment;
/// failed ones carry `error` and whatever location could be read.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemOutcome {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<IncidentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder: Option<ResponderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,
}

impl ItemOutcome {
    pub fn is_dispatched(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub dispatched: usize,
    pub failed: usize,
    pub items: Vec<ItemOutcome>,
    pub final_statuses: ResponderRegistry,
}

impl BatchSummary {
    pub fn from_items(items: Vec<ItemOutcome>, final_statuses: ResponderRegistry) -> Self {
        let dispatched = items.iter().filter(|i| i.is_dispatched()).count();
        Self {
            total: items.len(),
            dispatched,
            failed: items.len() - dispatched,
            items,
            final_statuses,
        }
    }

    pub fn failure_kinds(&self) -> Vec<ErrorKind> {
        self.items.iter().filter_map(|i| i.error.as_ref().map(|e| e.kind)).collect()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|i| i.alert.as_deref())
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = serde_json::to_string_pretty(self).with_context(|| "serialize batch summary")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_items() {
        let ok = ItemOutcome { index: 0, alert: Some("ALERT: x at y".into()), ..Default::default() };
        let bad = ItemOutcome {
            index: 1,
            error: Some(ItemError { kind: ErrorKind::Validation, message: "missing".into() }),
            ..Default::default()
        };
        let s = BatchSummary::from_items(vec![ok, bad], ResponderRegistry::new());
        assert_eq!((s.total, s.dispatched, s.failed), (2, 1, 1));
        assert_eq!(s.failure_kinds(), vec![ErrorKind::Validation]);
        assert_eq!(s.alerts().collect::<Vec<_>>(), vec!["ALERT: x at y"]);
    }

    #[test]
    fn empty_fields_are_omitted_in_json() {
        let item = ItemOutcome { index: 3, ..Default::default() };
        assert_eq!(serde_json::to_string(&item).unwrap(), r#"{"index":3}"#);
    }
}
