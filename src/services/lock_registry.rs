//! Per-account serialization units.
//!
//! Every account gets its own async mutex, created on first use. The registry
//! only keeps weak handles, so a unit disappears once no caller holds or
//! waits on it; dead entries are swept whenever the map reaches its
//! high-water mark. The registry lock is held only while looking a unit up,
//! never while a balance is being changed.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use tokio::sync::{Mutex as UnitMutex, OwnedMutexGuard};

use crate::models::account::AccountId;

/// Sweep threshold floor.
const MIN_SWEEP_AT: usize = 64;

/// Exclusive access to one account. Dropping it releases the account.
pub type AccountGuard = OwnedMutexGuard<()>;

#[derive(Debug)]
struct Units {
    by_account: HashMap<AccountId, Weak<UnitMutex<()>>>,
    sweep_at: usize,
}

#[derive(Debug)]
pub struct LockRegistry {
    units: Mutex<Units>,
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self {
            units: Mutex::new(Units {
                by_account: HashMap::new(),
                sweep_at: MIN_SWEEP_AT,
            }),
        }
    }
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the caller is the only one operating on `id`.
    ///
    /// Waiters are served in FIFO order by the underlying tokio mutex.
    pub async fn lock(&self, id: AccountId) -> AccountGuard {
        self.unit(id).lock_owned().await
    }

    /// Number of entries currently tracked, live or not yet swept.
    pub fn tracked(&self) -> usize {
        self.units
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_account
            .len()
    }

    fn unit(&self, id: AccountId) -> Arc<UnitMutex<()>> {
        let mut units = self.units.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(unit) = units.by_account.get(&id).and_then(Weak::upgrade) {
            return unit;
        }

        let unit = Arc::new(UnitMutex::new(()));
        units.by_account.insert(id, Arc::downgrade(&unit));

        if units.by_account.len() >= units.sweep_at {
            units.by_account.retain(|_, weak| weak.strong_count() > 0);
            units.sweep_at = (units.by_account.len() * 2).max(MIN_SWEEP_AT);
            tracing::trace!(live = units.by_account.len(), "swept idle account locks");
        }

        unit
    }
}
