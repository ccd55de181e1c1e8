use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::api::ConfigCallback;

/// Handle returned by a subscription; surrender it to unsubscribe.
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

/// Registry of configuration-change observers.
///
/// Also usable by test doubles of [`crate::StationApi`], which need to hand
/// out real tokens.
#[derive(Default)]
pub struct ObserverRegistry {
    listeners: Mutex<HashMap<u64, ConfigCallback>>,
    next_id: AtomicU64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: ConfigCallback) -> SubscriptionToken {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .expect("lock observer registry")
            .insert(id, callback);
        SubscriptionToken(id)
    }

    /// Removes a registration. Unknown tokens are a no-op.
    pub fn unsubscribe(&self, token: SubscriptionToken) {
        self.listeners
            .lock()
            .expect("lock observer registry")
            .remove(&token.0);
    }

    /// Invokes every registered callback. The lock is released before any
    /// callback runs so observers may re-subscribe from inside the callback.
    pub fn notify_all(&self) {
        let callbacks: Vec<ConfigCallback> = self
            .listeners
            .lock()
            .expect("lock observer registry")
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}
