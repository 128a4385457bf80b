//! Global concurrency gate backed by a shared counter.
//!
//! The counter at [`GATE_KEY`] holds the number of admitted requests across
//! every instance. A successful acquire hands out a [`GatePermit`]; the slot
//! is given back when the permit is released or dropped.

use tracing::{debug, error, warn};

use crate::kv::{KvStore, SharedKv};
use crate::ratelimit::{GateConfig, GateMode, RateLimitError, GATE_KEY};

/// Bounds the number of in-flight requests across all instances.
#[derive(Clone)]
pub struct ConcurrencyGate {
    kv: SharedKv,
    config: GateConfig,
}

impl ConcurrencyGate {
    pub const fn new(kv: SharedKv, config: GateConfig) -> Self {
        Self { kv, config }
    }

    /// Claims a slot, or refuses with `GateFull`.
    ///
    /// # Errors
    /// `RateLimitError::Store` if the shared counter cannot be read or updated.
    #[tracing::instrument(skip(self), fields(mode = %self.config.mode, capacity = self.config.capacity))]
    pub async fn acquire(&self) -> Result<GatePermit, RateLimitError> {
        match self.config.mode {
            GateMode::Atomic => self.acquire_atomic().await,
            GateMode::CheckThenIncr => self.acquire_check_then_incr().await,
        }
    }

    async fn acquire_atomic(&self) -> Result<GatePermit, RateLimitError> {
        let in_flight = self.kv.incr(GATE_KEY).await?;
        // Held from here so a cancelled acquire still backs out the increment.
        let permit = GatePermit::new(self.kv.clone());

        if in_flight > i64::from(self.config.capacity) {
            permit.release().await;
            debug!(in_flight = in_flight - 1, "Gate full");
            return Err(RateLimitError::GateFull {
                in_flight: in_flight - 1,
                capacity: self.config.capacity,
            });
        }

        debug!(in_flight, "Gate slot acquired");
        Ok(permit)
    }

    /// Read, compare, increment. Two acquirers can both pass the comparison
    /// before either increments.
    async fn acquire_check_then_incr(&self) -> Result<GatePermit, RateLimitError> {
        let current = match self.kv.get_int(GATE_KEY).await? {
            Some(value) => value,
            None => {
                self.kv.set(GATE_KEY, "0", None).await?;
                0
            }
        };

        if current >= i64::from(self.config.capacity) {
            debug!(in_flight = current, "Gate full");
            return Err(RateLimitError::GateFull {
                in_flight: current,
                capacity: self.config.capacity,
            });
        }

        let in_flight = self.kv.incr(GATE_KEY).await?;
        debug!(in_flight, "Gate slot acquired");
        Ok(GatePermit::new(self.kv.clone()))
    }
}

/// A claimed gate slot.
///
/// Call [`release`](Self::release) on the normal path. If the permit is
/// dropped instead (error return, cancelled request, panic), the slot is
/// released by a background task. Release failures are logged only.
#[must_use = "dropping a permit releases the gate slot immediately"]
pub struct GatePermit {
    kv: Option<SharedKv>,
}

impl GatePermit {
    const fn new(kv: SharedKv) -> Self {
        Self { kv: Some(kv) }
    }

    /// Gives the slot back and waits for the store to acknowledge.
    pub async fn release(mut self) {
        if let Some(kv) = self.kv.take() {
            release_slot(kv.as_ref()).await;
        }
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        let Some(kv) = self.kv.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Gate permit dropped without release, releasing in background");
                handle.spawn(async move {
                    release_slot(kv.as_ref()).await;
                });
            }
            Err(_) => error!("No runtime available, gate slot leaked"),
        }
    }
}

async fn release_slot(kv: &dyn KvStore) {
    match kv.decr(GATE_KEY).await {
        Ok(in_flight) if in_flight < 0 => {
            warn!(in_flight, "Gate counter went negative after release");
        }
        Ok(in_flight) => debug!(in_flight, "Gate slot released"),
        Err(e) => error!(error = %e, "Failed to release gate slot"),
    }
}
