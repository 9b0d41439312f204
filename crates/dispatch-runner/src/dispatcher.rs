use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use dispatch_core::{
    parse_emergency_report, render_location, send_alert, DispatchError, IncidentId, RawReport, ResponderId,
    ResponderStatus, ValidatedReport,
};
use dispatch_store::{InMemoryRegistryStore, RegistryStore};

use crate::summary::{BatchSummary, ItemError, ItemOutcome};
use crate::Config;

/// What happens to a responder after its report has been alerted.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseMode {
    /// Incident is treated as handled at once; responder returns to `available`.
    #[default]
    AfterEach,
    /// Responder stays `busy` until released explicitly.
    Hold,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub incident_id: IncidentId,
    pub report: ValidatedReport,
    pub responder: ResponderId,
    pub alert: String,
}

/// Runs validate, assign and alert against one long-lived registry.
pub struct Dispatcher {
    store: Arc<dyn RegistryStore>,
    alert_message: String,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn RegistryStore>, alert_message: impl Into<String>) -> Self {
        Self { store, alert_message: alert_message.into() }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let store = InMemoryRegistryStore::new(cfg.registry(), cfg.policy());
        Self::new(Arc::new(store), cfg.alert.message.clone())
    }

    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    pub fn dispatch(&self, raw: &RawReport) -> Result<Dispatch> {
        let report = parse_emergency_report(raw).map_err(DispatchError::from)?;
        let responder = self.store.assign(&report)?;
        let alert = send_alert(&self.alert_message, &report.location);
        Ok(Dispatch { incident_id: IncidentId::new(), report, responder, alert })
    }

    pub fn release(&self, responder: &ResponderId) -> Result<()> {
        self.store.release(responder)
    }

    /// Like `dispatch`, for an entry that may not even be a JSON object.
    pub fn dispatch_value(&self, value: &Value) -> Result<Dispatch> {
        let raw = RawReport::try_from(value.clone()).map_err(DispatchError::from)?;
        self.dispatch(&raw)
    }

    /// Processes every report in order. Dispatch failures are recorded per
    /// item and never stop the batch; only store failures abort it.
    pub fn run_batch(&self, reports: &[Value], mode: ReleaseMode) -> Result<BatchSummary> {
        let mut items = Vec::with_capacity(reports.len());
        for (index, value) in reports.iter().enumerate() {
            match self.dispatch_value(value) {
                Ok(d) => {
                    if mode == ReleaseMode::AfterEach {
                        self.release(&d.responder)?;
                    }
                    items.push(ItemOutcome {
                        index,
                        incident_id: Some(d.incident_id),
                        location: Some(d.report.location),
                        severity: Some(d.report.severity),
                        responder: Some(d.responder),
                        alert: Some(d.alert),
                        error: None,
                    });
                }
                Err(e) => {
                    let Some(de) = e.downcast_ref::<DispatchError>() else {
                        return Err(e);
                    };
                    warn!(index, kind = ?de.kind(), error = %de, "report not dispatched");
                    items.push(ItemOutcome {
                        index,
                        location: value.get("location").and_then(|l| render_location(l).ok()),
                        error: Some(ItemError { kind: de.kind(), message: de.to_string() }),
                        ..Default::default()
                    });
                }
            }
        }

        let summary = BatchSummary::from_items(items, self.store.snapshot()?);
        info!(total = summary.total, dispatched = summary.dispatched, failed = summary.failed, "batch complete");
        Ok(summary)
    }
}

/// Accepts a JSON array of reports, or a single report. Entries are kept
/// as-is; `run_batch` rejects non-objects per item.
pub fn parse_reports(json: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(json)?;
    Ok(match value {
        Value::Array(vs) => vs,
        other => vec![other],
    })
}

/// Parses `<id>=<status>`, e.g. `Joe=busy`.
pub fn parse_status_assignment(s: &str) -> Result<(ResponderId, ResponderStatus)> {
    let (id, status) = s.split_once('=').ok_or_else(|| anyhow!("expected <id>=<status>, got {:?}", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(anyhow!("empty responder id in {:?}", s));
    }
    Ok((ResponderId::from(id), status.parse()?))
}
