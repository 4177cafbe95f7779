//! Live sequences: lazily started, shared, replay-latest value streams.
//!
//! A [`LiveSequence`] wraps a [`Producer`]. The producer is spawned when the
//! first [`Subscription`] is created and is told to stop when the last one is
//! dropped, at which point it must release whatever platform registration it
//! holds. A later subscription starts a fresh producer.
//!
//! New subscribers immediately receive the most recent value, if any.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use launcher_core::utils::spawn_task;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};
use uuid::Uuid;

pub type SubscriptionId = Uuid;

/// Produces the values of a [`LiveSequence`].
#[async_trait]
pub trait Producer<T>: Send + Sync + 'static {
    /// Runs until `stop` resolves (or the producer's own source ends).
    ///
    /// Implementations must unregister any platform listener before returning.
    async fn produce(&self, emitter: Emitter<T>, stop: oneshot::Receiver<()>);
}

struct ActiveProducer {
    stop_tx: oneshot::Sender<()>,
}

struct Shared<T> {
    subscribers: HashMap<SubscriptionId, mpsc::UnboundedSender<T>>,
    latest: Option<T>,
    active: Option<ActiveProducer>,
    // Bumped on every start and stop so a stopping producer cannot publish.
    generation: u64,
}

fn lock<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A shared, lazily started stream of values.
pub struct LiveSequence<T> {
    name: &'static str,
    producer: Arc<dyn Producer<T>>,
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for LiveSequence<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            producer: Arc::clone(&self.producer),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + 'static> LiveSequence<T> {
    pub fn new(name: &'static str, producer: impl Producer<T>) -> Self {
        Self {
            name,
            producer: Arc::new(producer),
            shared: Arc::new(Mutex::new(Shared {
                subscribers: HashMap::new(),
                latest: None,
                active: None,
                generation: 0,
            })),
        }
    }

    /// Subscribes to the sequence, starting the producer if needed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(&self) -> Subscription<T> {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut shared = lock(&self.shared);

        if let Some(latest) = &shared.latest {
            let _ = tx.send(latest.clone());
        }
        shared.subscribers.insert(id, tx);

        if shared.active.is_none() {
            shared.generation += 1;
            let emitter = Emitter {
                shared: Arc::downgrade(&self.shared),
                generation: shared.generation,
            };
            let (stop_tx, stop_rx) = oneshot::channel();
            let producer = Arc::clone(&self.producer);
            let name = self.name;
            spawn_task(async move {
                debug!(sequence = name, "Producer started");
                producer.produce(emitter, stop_rx).await;
                debug!(sequence = name, "Producer finished");
            });
            shared.active = Some(ActiveProducer { stop_tx });
        }

        trace!(sequence = self.name, subscription = %id, subscribers = shared.subscribers.len(), "Subscribed");
        Subscription {
            id,
            name: self.name,
            receiver: rx,
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared).subscribers.len()
    }

    /// `true` while a producer is running for current subscribers.
    pub fn is_active(&self) -> bool {
        lock(&self.shared).active.is_some()
    }

    /// Most recent value emitted by the current producer.
    pub fn latest(&self) -> Option<T> {
        lock(&self.shared).latest.clone()
    }
}

/// Handle a [`Producer`] uses to publish values.
pub struct Emitter<T> {
    shared: Weak<Mutex<Shared<T>>>,
    generation: u64,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
            generation: self.generation,
        }
    }
}

impl<T: Clone> Emitter<T> {
    /// Publishes `value` to every subscriber.
    ///
    /// Returns `false` once the producer has been asked to stop.
    pub fn emit(&self, value: T) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let mut shared = lock(&shared);
        if shared.generation != self.generation {
            return false;
        }
        shared.subscribers.retain(|_, tx| tx.send(value.clone()).is_ok());
        shared.latest = Some(value);
        true
    }
}

/// One consumer's view of a [`LiveSequence`]. Dropping it unsubscribes.
pub struct Subscription<T> {
    id: SubscriptionId,
    name: &'static str,
    receiver: mpsc::UnboundedReceiver<T>,
    shared: Weak<Mutex<Shared<T>>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next value. `None` once the producer has gone away.
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Returns a value that is already queued, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let mut shared = lock(&shared);
        shared.subscribers.remove(&self.id);
        trace!(sequence = self.name, subscription = %self.id, "Unsubscribed");

        if shared.subscribers.is_empty() {
            if let Some(active) = shared.active.take() {
                debug!(sequence = self.name, "Last subscriber left, stopping producer");
                let _ = active.stop_tx.send(());
            }
            shared.latest = None;
            shared.generation += 1;
        }
    }
}
