use std::collections::BTreeSet;

use dispatch_core::{ResponderId, ResponderRegistry, ResponderStatus, ValidatedReport};

/// A registry shared between callers. Implementations must make
/// select-and-mark-busy a single atomic step.
pub trait RegistryStore: Send + Sync {
    fn snapshot(&self) -> anyhow::Result<ResponderRegistry>;

    fn available_ids(&self) -> anyhow::Result<BTreeSet<ResponderId>>;

    /// Errors carry a `dispatch_core::DispatchError` when the failure is a
    /// dispatch outcome (use `downcast_ref`).
    fn assign(&self, report: &ValidatedReport) -> anyhow::Result<ResponderId>;

    fn set_status(&self, id: &ResponderId, status: ResponderStatus) -> anyhow::Result<()>;

    fn release(&self, id: &ResponderId) -> anyhow::Result<()> {
        self.set_status(id, ResponderStatus::Available)
    }
}
