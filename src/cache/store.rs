//! Query result storage.
//!
//! The post list is a singleton slot; single-post queries live in an LRU.

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::Instant;

use blogdesk_api_types::Post;
use lru::LruCache;
use metrics::counter;

use crate::api::ApiError;

use super::keys::QueryKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Successful payload of a cached query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Posts(Vec<Post>),
    Post(Post),
}

impl QueryData {
    pub fn as_posts(&self) -> Option<&[Post]> {
        match self {
            Self::Posts(posts) => Some(posts),
            Self::Post(_) => None,
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            Self::Post(post) => Some(post),
            Self::Posts(_) => None,
        }
    }
}

/// Latest settled state of one query.
///
/// `data` survives a later failure so views can keep showing the last good result.
#[derive(Debug, Clone)]
pub struct QueryEntry {
    pub data: Option<QueryData>,
    pub error: Option<ApiError>,
    pub fresh: bool,
    pub settled_at: Instant,
}

impl QueryEntry {
    pub fn result(&self) -> Result<QueryData, ApiError> {
        match (&self.error, &self.data) {
            (Some(error), _) => Err(error.clone()),
            (None, Some(data)) => Ok(data.clone()),
            (None, None) => Err(ApiError::message("query settled without data")),
        }
    }

    /// Fresh and successful: can be served without a request.
    pub fn is_servable(&self) -> bool {
        self.fresh && self.error.is_none() && self.data.is_some()
    }
}

pub struct QueryStore {
    list: RwLock<Option<QueryEntry>>,
    posts: RwLock<LruCache<String, QueryEntry>>,
}

impl QueryStore {
    pub fn new(post_limit: NonZeroUsize) -> Self {
        Self {
            list: RwLock::new(None),
            posts: RwLock::new(LruCache::new(post_limit)),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<QueryEntry> {
        match key {
            QueryKey::ListPosts => rw_read(&self.list, SOURCE, "get.list").clone(),
            QueryKey::Post(id) => rw_write(&self.posts, SOURCE, "get.post").get(id).cloned(),
        }
    }

    /// Store a settled result, returning the key of an entry evicted to make room.
    pub fn settle(&self, key: &QueryKey, result: Result<QueryData, ApiError>) -> Option<QueryKey> {
        match key {
            QueryKey::ListPosts => {
                let mut slot = rw_write(&self.list, SOURCE, "settle.list");
                let previous = slot.take();
                *slot = Some(merge(previous, result));
                None
            }
            QueryKey::Post(id) => {
                let mut posts = rw_write(&self.posts, SOURCE, "settle.post");
                let previous = posts.pop(id);
                let evicted = posts.push(id.clone(), merge(previous, result));
                evicted
                    .filter(|(evicted_id, _)| evicted_id != id)
                    .map(|(evicted_id, _)| {
                        counter!("blogdesk_cache_evict_total").increment(1);
                        QueryKey::Post(evicted_id)
                    })
            }
        }
    }

    /// Mark an entry stale. Returns false when nothing is cached under `key`.
    pub fn mark_stale(&self, key: &QueryKey) -> bool {
        let mut mark = |entry: &mut QueryEntry| entry.fresh = false;
        match key {
            QueryKey::ListPosts => rw_write(&self.list, SOURCE, "mark_stale.list")
                .as_mut()
                .map(&mut mark)
                .is_some(),
            QueryKey::Post(id) => rw_write(&self.posts, SOURCE, "mark_stale.post")
                .peek_mut(id)
                .map(&mut mark)
                .is_some(),
        }
    }

    pub fn len(&self) -> usize {
        let list = usize::from(rw_read(&self.list, SOURCE, "len.list").is_some());
        list + rw_read(&self.posts, SOURCE, "len.posts").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn merge(previous: Option<QueryEntry>, result: Result<QueryData, ApiError>) -> QueryEntry {
    let settled_at = Instant::now();
    match result {
        Ok(data) => QueryEntry {
            data: Some(data),
            error: None,
            fresh: true,
            settled_at,
        },
        Err(error) => QueryEntry {
            data: previous.and_then(|entry| entry.data),
            error: Some(error),
            fresh: true,
            settled_at,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            description: String::new(),
            featured_image: String::new(),
            publish_date: String::new(),
            published: false,
        }
    }

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero")
    }

    #[test]
    fn settle_and_get_list() {
        let store = QueryStore::new(limit(4));
        assert!(store.get(&QueryKey::ListPosts).is_none());

        store.settle(&QueryKey::ListPosts, Ok(QueryData::Posts(vec![post("1")])));
        let entry = store.get(&QueryKey::ListPosts).expect("entry");
        assert!(entry.is_servable());
        assert_eq!(entry.result().expect("ok").as_posts().map(<[Post]>::len), Some(1));
    }

    #[test]
    fn failure_keeps_previous_data() {
        let store = QueryStore::new(limit(4));
        store.settle(&QueryKey::ListPosts, Ok(QueryData::Posts(vec![post("1")])));
        store.settle(&QueryKey::ListPosts, Err(ApiError::transport(500, serde_json::Value::Null)));

        let entry = store.get(&QueryKey::ListPosts).expect("entry");
        assert!(!entry.is_servable());
        assert!(entry.data.is_some());
        assert!(entry.result().is_err());
    }

    #[test]
    fn mark_stale_only_touches_existing_entries() {
        let store = QueryStore::new(limit(4));
        assert!(!store.mark_stale(&QueryKey::Post("1".into())));

        store.settle(&QueryKey::Post("1".into()), Ok(QueryData::Post(post("1"))));
        assert!(store.mark_stale(&QueryKey::Post("1".into())));
        let entry = store.get(&QueryKey::Post("1".into())).expect("entry");
        assert!(!entry.fresh);
        assert!(!entry.is_servable());
    }

    #[test]
    fn lru_evicts_least_recent_post() {
        let store = QueryStore::new(limit(1));
        assert!(
            store
                .settle(&QueryKey::Post("1".into()), Ok(QueryData::Post(post("1"))))
                .is_none()
        );
        let evicted = store.settle(&QueryKey::Post("2".into()), Ok(QueryData::Post(post("2"))));
        assert_eq!(evicted, Some(QueryKey::Post("1".into())));
        assert!(store.get(&QueryKey::Post("1".into())).is_none());
    }

    #[test]
    fn resettling_same_key_is_not_an_eviction() {
        let store = QueryStore::new(limit(1));
        store.settle(&QueryKey::Post("1".into()), Ok(QueryData::Post(post("1"))));
        let evicted = store.settle(&QueryKey::Post("1".into()), Ok(QueryData::Post(post("1"))));
        assert!(evicted.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn len_counts_list_and_posts() {
        let store = QueryStore::new(limit(2));
        assert!(store.is_empty());
        store.settle(&QueryKey::ListPosts, Ok(QueryData::Posts(Vec::new())));
        store.settle(&QueryKey::Post("1".into()), Ok(QueryData::Post(post("1"))));
        assert_eq!(store.len(), 2);
    }
}
