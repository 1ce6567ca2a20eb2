//! Typed publish/subscribe between the hook thread and consumers.
//!
//! Handlers run on the publishing thread. `publish` copies the matching
//! handlers out under the lock and calls them after releasing it, so a
//! handler may subscribe, unsubscribe or publish again without
//! deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::payload::{Payload, PayloadKind};

type Handler = Arc<dyn Fn(&Payload) + Send + Sync>;

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    kind: PayloadKind,
    handler: Handler,
}

#[derive(Default)]
struct Inner {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

/// Cheaply cloneable handle to a shared subscriber set.
#[derive(Clone, Default)]
pub struct Channel {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every payload of `kind`.
    pub fn subscribe<F>(&self, kind: PayloadKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.insert(id, kind, Arc::new(handler));
        id
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn insert(&self, id: SubscriptionId, kind: PayloadKind, handler: Handler) {
        let mut subs = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subs.push(Subscriber { id, kind, handler });
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    /// Forwards every payload of the given kinds into `tx`.
    ///
    /// The consumer drains the receiver on its own thread, so the
    /// publisher only pays for a channel send. Each forwarding
    /// subscription removes itself once the receiver is dropped.
    pub fn forward(&self, kinds: &[PayloadKind], tx: Sender<Payload>) -> Vec<SubscriptionId> {
        kinds
            .iter()
            .map(|&kind| {
                let id = self.next_id();
                let tx = tx.clone();
                let channel = Arc::downgrade(&self.inner);
                let handler: Handler = Arc::new(move |payload: &Payload| {
                    if tx.send(payload.clone()).is_ok() {
                        return;
                    }
                    tracing::debug!(?kind, "payload receiver dropped; forwarding stopped");
                    if let Some(inner) = Weak::upgrade(&channel) {
                        Channel { inner }.unsubscribe(id);
                    }
                });
                self.insert(id, kind, handler);
                id
            })
            .collect()
    }

    /// Delivers `payload` to every handler subscribed to its kind.
    pub fn publish(&self, payload: Payload) {
        let kind = payload.kind();
        let handlers: Vec<Handler> = {
            let subs = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            subs.iter()
                .filter(|s| s.kind == kind)
                .map(|s| Arc::clone(&s.handler))
                .collect()
        };
        tracing::trace!(?kind, handlers = handlers.len(), "publish");
        for handler in handlers {
            handler(&payload);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().map_or(0, |subs| subs.len())
    }
}
