//! Per-host request spacing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

use crate::catalog::PlatformCatalog;
use crate::errors::{PhoenixResult, ProbeError};

/// Serializes requests to one host and spaces their starts by `interval`.
#[derive(Debug)]
pub(crate) struct HostGate {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl HostGate {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for this host's next slot, then take a worker permit.
    ///
    /// The host lock is held while waiting for the permit so that the slot
    /// is stamped at the moment the request can actually start; only this
    /// host's other probes wait on it, and no permit is held while sleeping.
    pub(crate) async fn acquire(&self, pool: &Arc<Semaphore>) -> Result<OwnedSemaphorePermit, ProbeError> {
        let mut next = self.next_slot.lock().await;
        if let Some(slot) = *next {
            tokio::time::sleep_until(slot).await;
        }
        let permit = Arc::clone(pool)
            .acquire_owned()
            .await
            .map_err(|_| ProbeError::Request("worker pool closed".to_string()))?;
        *next = Some(Instant::now() + self.interval);
        Ok(permit)
    }
}

/// One gate per distinct host in a catalog.
#[derive(Debug, Default)]
pub(crate) struct HostGates {
    gates: HashMap<String, Arc<HostGate>>,
}

impl HostGates {
    /// Platforms sharing a host share a gate at the strictest declared limit.
    pub(crate) fn for_catalog(catalog: &PlatformCatalog) -> PhoenixResult<Self> {
        let mut intervals: HashMap<String, Duration> = HashMap::new();
        for platform in catalog.list_platforms() {
            let interval = platform.rate_limit.interval();
            intervals
                .entry(platform.host()?)
                .and_modify(|current| *current = (*current).max(interval))
                .or_insert(interval);
        }

        let gates = intervals
            .into_iter()
            .map(|(host, interval)| (host, Arc::new(HostGate::new(interval))))
            .collect();
        Ok(Self { gates })
    }

    pub(crate) fn get(&self, host: &str) -> Option<Arc<HostGate>> {
        self.gates.get(host).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.gates.len()
    }
}
