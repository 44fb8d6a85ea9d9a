//! Bidirectional tag registry.
//!
//! Tracks which cached queries provide which tags, so a mutation can find
//! every query it makes stale.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::keys::{QueryKey, Tag};
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::registry";

/// Tracks tag → query keys and query key → tags mappings.
pub struct TagRegistry {
    /// Maps tags to all queries that provided them
    tag_to_keys: RwLock<HashMap<Tag, HashSet<QueryKey>>>,
    /// Maps queries to the tags of their latest result
    key_to_tags: RwLock<HashMap<QueryKey, HashSet<Tag>>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self {
            tag_to_keys: RwLock::new(HashMap::new()),
            key_to_tags: RwLock::new(HashMap::new()),
        }
    }

    /// Record the tags provided by the latest result of `key`.
    ///
    /// Replaces whatever the previous result of the same query provided.
    pub fn register(&self, key: QueryKey, tags: impl IntoIterator<Item = Tag>) {
        let mut t2k = rw_write(&self.tag_to_keys, SOURCE, "register.tag_to_keys");
        let mut k2t = rw_write(&self.key_to_tags, SOURCE, "register.key_to_tags");

        if let Some(previous) = k2t.remove(&key) {
            detach(&mut t2k, &key, previous);
        }

        let tags: HashSet<Tag> = tags.into_iter().collect();
        for tag in &tags {
            t2k.entry(tag.clone()).or_default().insert(key.clone());
        }
        k2t.insert(key, tags);
    }

    /// Get all queries that provided `tag`.
    pub fn keys_for_tag(&self, tag: &Tag) -> HashSet<QueryKey> {
        rw_read(&self.tag_to_keys, SOURCE, "keys_for_tag")
            .get(tag)
            .cloned()
            .unwrap_or_default()
    }

    /// Get all tags provided by `key`.
    pub fn tags_for_key(&self, key: &QueryKey) -> HashSet<Tag> {
        rw_read(&self.key_to_tags, SOURCE, "tags_for_key")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove a query and clean up tag mappings.
    ///
    /// Called when a cache entry is evicted.
    pub fn unregister(&self, key: &QueryKey) {
        let mut t2k = rw_write(&self.tag_to_keys, SOURCE, "unregister.tag_to_keys");
        let mut k2t = rw_write(&self.key_to_tags, SOURCE, "unregister.key_to_tags");

        if let Some(tags) = k2t.remove(key) {
            detach(&mut t2k, key, tags);
        }
    }

    /// Get the number of tracked tags.
    pub fn tag_count(&self) -> usize {
        rw_read(&self.tag_to_keys, SOURCE, "tag_count").len()
    }

    /// Get the number of tracked queries.
    pub fn key_count(&self) -> usize {
        rw_read(&self.key_to_tags, SOURCE, "key_count").len()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn detach(t2k: &mut HashMap<Tag, HashSet<QueryKey>>, key: &QueryKey, tags: HashSet<Tag>) {
    for tag in tags {
        if let Some(keys) = t2k.get_mut(&tag) {
            keys.remove(key);
            if keys.is_empty() {
                t2k.remove(&tag);
            }
        }
    }
}
