//! A single "pending action" slot that is re-armed only when its key changes.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use launcher_core::utils::spawn_task;
use tokio::task::JoinHandle;
use tracing::trace;

struct Slot<K> {
    last_key: Option<K>,
    pending: Option<JoinHandle<()>>,
}

pub(crate) struct Debouncer<K> {
    delay: Duration,
    slot: Mutex<Slot<K>>,
}

impl<K: PartialEq + Clone + Send + 'static> Debouncer<K> {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Mutex::new(Slot {
                last_key: None,
                pending: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<K>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the latest `key`.
    ///
    /// An unchanged key leaves the slot alone. A changed key cancels whatever
    /// is pending and, if `armed`, schedules `on_fire(key)` after the delay.
    pub(crate) fn update<F, Fut>(&self, key: K, armed: bool, on_fire: F)
    where
        F: FnOnce(K) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.lock();
        if slot.last_key.as_ref() == Some(&key) {
            return;
        }
        if let Some(pending) = slot.pending.take() {
            pending.abort();
            trace!("Pending action cancelled");
        }
        slot.last_key = Some(key.clone());

        if armed {
            let delay = self.delay;
            slot.pending = Some(spawn_task(async move {
                tokio::time::sleep(delay).await;
                on_fire(key).await;
            }));
        }
    }

    /// Called from a fired timer. Returns `true` if `key` is still current,
    /// releasing the slot without cancelling the caller.
    pub(crate) fn claim(&self, key: &K) -> bool {
        let mut slot = self.lock();
        if slot.last_key.as_ref() != Some(key) {
            return false;
        }
        slot.pending.take().is_some()
    }

    pub(crate) fn cancel(&self) {
        if let Some(pending) = self.lock().pending.take() {
            pending.abort();
            trace!("Pending action cancelled");
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.lock().pending.is_some()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
    }
}
