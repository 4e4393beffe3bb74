use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use slotmap::{SlotMap, new_key_type};
use tracing::debug;

use crate::common::collections::HashMap;

new_key_type! {
    pub struct SubscriberKey;
}

type Handler = Arc<Mutex<dyn FnMut(&Value) + Send>>;

#[derive(Default)]
struct Inner {
    topics: HashMap<String, SlotMap<SubscriberKey, Handler>>,
}

/// Topic-keyed event delivery from the backend to floating surfaces.
///
/// Payloads are delivered at-most-once per emission to a snapshot of the
/// subscribers registered at emit time; there is no replay for late
/// subscribers. Subscribing to `"*"` receives every topic.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Inner>>,
}

impl EventBus {
    pub fn new() -> Self { Self::default() }

    /// Registers `handler` for `topic` and returns a guard that unsubscribes
    /// on drop.
    pub fn subscribe(
        &self,
        topic: impl Into<String>,
        handler: impl FnMut(&Value) + Send + 'static,
    ) -> Subscription {
        let topic = topic.into();
        let handler: Handler = Arc::new(Mutex::new(handler));
        let key = self
            .inner
            .lock()
            .topics
            .entry(topic.clone())
            .or_default()
            .insert(handler);
        debug!(%topic, "subscribed");
        Subscription {
            bus: self.clone(),
            topic,
            key,
        }
    }

    /// Delivers `payload` to every current subscriber of `topic` (plus `"*"`
    /// subscribers); returns how many handlers ran. Handlers are invoked
    /// outside the registry lock, so they may subscribe or unsubscribe freely.
    pub fn emit(&self, topic: &str, payload: &Value) -> usize {
        let handlers: Vec<Handler> = {
            let inner = self.inner.lock();
            let mut snapshot = Vec::new();
            if let Some(subs) = inner.topics.get(topic) {
                snapshot.extend(subs.values().cloned());
            }
            if topic != "*"
                && let Some(subs) = inner.topics.get("*")
            {
                snapshot.extend(subs.values().cloned());
            }
            snapshot
        };

        let mut delivered = 0;
        for handler in &handlers {
            // A handler re-entering emit on its own topic mid-delivery would
            // deadlock on its non-reentrant lock; busy handlers are skipped.
            if let Some(mut run) = handler.try_lock() {
                run(payload);
                delivered += 1;
            }
        }
        delivered
    }

    fn unsubscribe(&self, topic: &str, key: SubscriberKey) {
        let mut inner = self.inner.lock();
        if let Some(subs) = inner.topics.get_mut(topic) {
            subs.remove(key);
            if subs.is_empty() {
                inner.topics.remove(topic);
            }
        }
        debug!(%topic, "unsubscribed");
    }
}

/// Active subscription; dropping it unsubscribes.
pub struct Subscription {
    bus: EventBus,
    topic: String,
    key: SubscriberKey,
}

impl Subscription {
    pub fn topic(&self) -> &str { &self.topic }
}

impl Drop for Subscription {
    fn drop(&mut self) { self.bus.unsubscribe(&self.topic, self.key); }
}
