use tracing::{debug, info};

use crate::{
    error::DispatchError, ids::ResponderId, model::ResponderStatus, policy::SelectionPolicy,
    registry::ResponderRegistry, report::ValidatedReport,
};

/// Picks an available responder for `report` and marks it busy.
///
/// On any error the registry is left untouched. There is no retry here;
/// callers decide whether to queue the report and try again.
pub fn assign_responder(
    report: &ValidatedReport,
    registry: &mut ResponderRegistry,
    policy: &mut dyn SelectionPolicy,
) -> Result<ResponderId, DispatchError> {
    let available = registry.available_ids();
    if available.is_empty() {
        debug!(location = %report.location, "no available responders");
        return Err(DispatchError::NoResponderAvailable);
    }

    let chosen = policy.select(report, &available).ok_or(DispatchError::NoResponderAvailable)?;
    if !available.contains(&chosen) {
        return Err(DispatchError::InvalidSelection(chosen));
    }

    registry.set_status(&chosen, ResponderStatus::Busy)?;
    info!(
        responder = %chosen,
        location = %report.location,
        severity = report.severity,
        policy = policy.name(),
        "responder assigned"
    );
    Ok(chosen)
}

/// Returns a responder to service once its incident is handled.
pub fn release_responder(registry: &mut ResponderRegistry, id: &ResponderId) -> Result<(), DispatchError> {
    registry.set_status(id, ResponderStatus::Available)
}
