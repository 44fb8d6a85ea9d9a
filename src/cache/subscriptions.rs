//! Active-subscriber bookkeeping.
//!
//! A view holds a [`Subscription`] while it displays a query; invalidated
//! queries with at least one subscriber are re-run right away.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::keys::QueryKey;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::subscriptions";

#[derive(Default)]
pub struct SubscriptionTable {
    counts: Mutex<HashMap<QueryKey, usize>>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `key` until the returned guard is dropped.
    pub fn subscribe(self: &Arc<Self>, key: QueryKey) -> Subscription {
        *mutex_lock(&self.counts, SOURCE, "subscribe")
            .entry(key.clone())
            .or_insert(0) += 1;
        Subscription {
            table: Arc::clone(self),
            key,
        }
    }

    pub fn is_active(&self, key: &QueryKey) -> bool {
        self.subscribers(key) > 0
    }

    pub fn subscribers(&self, key: &QueryKey) -> usize {
        mutex_lock(&self.counts, SOURCE, "subscribers")
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    fn release(&self, key: &QueryKey) {
        let mut counts = mutex_lock(&self.counts, SOURCE, "release");
        if let Some(count) = counts.get_mut(key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                counts.remove(key);
            }
        }
    }
}

/// RAII handle for one subscriber of a query.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    table: Arc<SubscriptionTable>,
    key: QueryKey,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.table.release(&self.key);
    }
}
