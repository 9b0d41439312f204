use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use dispatch_core::{
    assign_responder, release_responder, ResponderId, ResponderRegistry, ResponderStatus, SelectionPolicy,
    ValidatedReport,
};

use crate::traits::RegistryStore;

#[derive(Debug, thiserror::Error)]
#[error("registry lock poisoned by a panicking holder")]
pub struct LockPoisoned;

/// Registry and policy behind one lock, so no two callers observe the same
/// available responder.
pub struct InMemoryRegistryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    registry: ResponderRegistry,
    policy: Box<dyn SelectionPolicy>,
}

impl InMemoryRegistryStore {
    pub fn new(registry: ResponderRegistry, policy: Box<dyn SelectionPolicy>) -> Self {
        Self { inner: Mutex::new(Inner { registry, policy }) }
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| LockPoisoned.into())
    }
}

impl RegistryStore for InMemoryRegistryStore {
    fn snapshot(&self) -> anyhow::Result<ResponderRegistry> {
        Ok(self.lock()?.registry.clone())
    }

    fn available_ids(&self) -> anyhow::Result<BTreeSet<ResponderId>> {
        Ok(self.lock()?.registry.available_ids())
    }

    fn assign(&self, report: &ValidatedReport) -> anyhow::Result<ResponderId> {
        let mut inner = self.lock()?;
        let Inner { registry, policy } = &mut *inner;
        Ok(assign_responder(report, registry, policy.as_mut())?)
    }

    fn set_status(&self, id: &ResponderId, status: ResponderStatus) -> anyhow::Result<()> {
        self.lock()?.registry.set_status(id, status)?;
        Ok(())
    }

    fn release(&self, id: &ResponderId) -> anyhow::Result<()> {
        release_responder(&mut self.lock()?.registry, id)?;
        Ok(())
    }
}
