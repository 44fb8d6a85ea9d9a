//! Cached posts API.
//!
//! Reads go through the query cache; mutations go straight to the server and,
//! once accepted, invalidate the tags their endpoint declares. Invalidated
//! queries with live subscribers are re-run before the mutation returns.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use blogdesk_api_types::{Empty, Post, PostDraft};
use dashmap::DashMap;
use metrics::counter;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::api::{ApiError, PostsClient, endpoints};
use crate::cache::{
    QueryData, QueryKey, QueryStore, Subscription, SubscriptionTable, Tag, TagRegistry,
};
use crate::config::{CacheSettings, Settings};
use crate::infra::error::InfraError;

/// Lifecycle of a query as seen by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected,
}

/// Point-in-time view of one query.
#[derive(Debug, Clone)]
pub struct QueryState {
    pub status: QueryStatus,
    /// Last successful payload, kept across later failures.
    pub data: Option<QueryData>,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl QueryState {
    /// First fetch still running: nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none()
    }
}

#[derive(Clone)]
pub struct BlogApi {
    inner: Arc<Inner>,
}

struct Inner {
    client: PostsClient,
    store: QueryStore,
    registry: TagRegistry,
    subscriptions: Arc<SubscriptionTable>,
    fetch_locks: DashMap<QueryKey, Arc<AsyncMutex<()>>>,
    in_flight: DashMap<QueryKey, usize>,
}

impl BlogApi {
    pub fn new(client: PostsClient, cache: &CacheSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                store: QueryStore::new(cache.post_limit),
                registry: TagRegistry::new(),
                subscriptions: Arc::new(SubscriptionTable::new()),
                fetch_locks: DashMap::new(),
                in_flight: DashMap::new(),
            }),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, InfraError> {
        let client = PostsClient::new(&settings.api)?;
        Ok(Self::new(client, &settings.cache))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let data = self.query(QueryKey::ListPosts, false).await?;
        data.as_posts()
            .map(<[Post]>::to_vec)
            .ok_or_else(|| mismatched(&QueryKey::ListPosts))
    }

    /// Callers skip this entirely when no post is selected.
    pub async fn get_post(&self, id: &str) -> Result<Post, ApiError> {
        let key = QueryKey::Post(id.to_string());
        let data = self.query(key.clone(), false).await?;
        data.as_post().cloned().ok_or_else(|| mismatched(&key))
    }

    /// Re-run a query regardless of freshness.
    pub async fn refetch(&self, key: QueryKey) -> Result<QueryData, ApiError> {
        self.query(key, true).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn add_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let post = self.inner.client.add_post(draft).await?;
        info!(post_id = %post.id, "post created");
        self.invalidate(&endpoints::add_post_invalidates()).await;
        Ok(post)
    }

    pub async fn update_post(&self, id: &str, body: &Post) -> Result<Post, ApiError> {
        let post = self.inner.client.update_post(id, body).await?;
        info!(post_id = %id, "post updated");
        self.invalidate(&endpoints::update_post_invalidates(id)).await;
        Ok(post)
    }

    pub async fn delete_post(&self, id: &str) -> Result<Empty, ApiError> {
        let empty = self.inner.client.delete_post(id).await?;
        info!(post_id = %id, "post deleted");
        self.invalidate(&endpoints::delete_post_invalidates(id)).await;
        Ok(empty)
    }

    // ========================================================================
    // Cache inspection
    // ========================================================================

    /// Keep `key` live: it is re-run as soon as a mutation invalidates it.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        self.inner.subscriptions.subscribe(key)
    }

    pub fn query_state(&self, key: &QueryKey) -> QueryState {
        let is_fetching = self.inner.in_flight.contains_key(key);
        let entry = self.inner.store.get(key);

        let status = match (&entry, is_fetching) {
            (_, true) => QueryStatus::Pending,
            (None, false) => QueryStatus::Uninitialized,
            (Some(entry), false) if entry.error.is_some() => QueryStatus::Rejected,
            (Some(_), false) => QueryStatus::Fulfilled,
        };

        match entry {
            Some(entry) => QueryState {
                status,
                is_stale: !entry.fresh,
                data: entry.data,
                error: entry.error,
                is_fetching,
            },
            None => QueryState {
                status,
                data: None,
                error: None,
                is_fetching,
                is_stale: false,
            },
        }
    }

    /// Tags currently provided by `key`, in sorted order.
    pub fn tags_for(&self, key: &QueryKey) -> Vec<Tag> {
        let tags: BTreeSet<Tag> = self.inner.registry.tags_for_key(key).into_iter().collect();
        tags.into_iter().collect()
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.inner
            .store
            .get(key)
            .is_some_and(|entry| !entry.fresh)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn query(&self, key: QueryKey, force: bool) -> Result<QueryData, ApiError> {
        let requested_at = Instant::now();

        if !force
            && let Some(entry) = self.inner.store.get(&key)
            && entry.is_servable()
        {
            counter!("blogdesk_cache_hit_total").increment(1);
            return entry.result();
        }

        let lock = Arc::clone(&*self.inner.fetch_locks.entry(key.clone()).or_default());
        let _guard = lock.lock().await;

        // Whoever held the lock may have settled this key after we asked.
        if let Some(entry) = self.inner.store.get(&key)
            && entry.fresh
            && entry.settled_at >= requested_at
        {
            counter!("blogdesk_cache_hit_total").increment(1);
            debug!(%key, "joined in-flight query");
            return entry.result();
        }

        counter!("blogdesk_cache_miss_total").increment(1);
        let result = {
            let _in_flight = InFlight::start(&self.inner.in_flight, &key);
            self.fetch(&key).await
        };

        let tags = endpoints::provided_tags(&key, &result);
        debug!(%key, tags = tags.len(), ok = result.is_ok(), "query settled");
        self.inner.registry.register(key.clone(), tags);
        if let Some(evicted) = self.inner.store.settle(&key, result.clone()) {
            self.inner.registry.unregister(&evicted);
            self.inner.fetch_locks.remove(&evicted);
            debug!(key = %evicted, "query evicted");
        }

        result
    }

    async fn fetch(&self, key: &QueryKey) -> Result<QueryData, ApiError> {
        match key {
            QueryKey::ListPosts => self.inner.client.list_posts().await.map(QueryData::Posts),
            QueryKey::Post(id) => self.inner.client.get_post(id).await.map(QueryData::Post),
        }
    }

    async fn invalidate(&self, tags: &[Tag]) {
        let affected: BTreeSet<QueryKey> = tags
            .iter()
            .flat_map(|tag| self.inner.registry.keys_for_tag(tag))
            .collect();

        for key in &affected {
            if self.inner.store.mark_stale(key) {
                counter!("blogdesk_cache_invalidate_total").increment(1);
            }
        }
        debug!(
            tags = ?tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            affected = affected.len(),
            "tags invalidated"
        );

        for key in affected {
            if !self.inner.subscriptions.is_active(&key) {
                continue;
            }
            counter!("blogdesk_cache_refetch_total").increment(1);
            if let Err(error) = self.query(key.clone(), true).await {
                warn!(%key, error = %error, "refetch after invalidation failed");
            }
        }
    }
}

impl fmt::Debug for BlogApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlogApi")
            .field("base_url", &self.inner.client.base_url().as_str())
            .field("cached_queries", &self.inner.store.len())
            .field("tagged_queries", &self.inner.registry.key_count())
            .field("tags", &self.inner.registry.tag_count())
            .finish_non_exhaustive()
    }
}

fn mismatched(key: &QueryKey) -> ApiError {
    ApiError::message(format!("cached data for {key} has an unexpected shape"))
}

/// Marks a key as fetching for as long as it lives.
struct InFlight<'a> {
    map: &'a DashMap<QueryKey, usize>,
    key: QueryKey,
}

impl<'a> InFlight<'a> {
    fn start(map: &'a DashMap<QueryKey, usize>, key: &QueryKey) -> Self {
        *map.entry(key.clone()).or_insert(0) += 1;
        Self {
            map,
            key: key.clone(),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.map.remove_if_mut(&self.key, |_, count| {
            *count = count.saturating_sub(1);
            *count == 0
        });
    }
}
