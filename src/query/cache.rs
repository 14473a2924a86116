//! Keyed response cache with name-wide invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::store::{EntityId, QueryParams};

/// Second half of a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryPart {
    /// A list query, by the JSON signature of its parameters.
    List(String),
    /// One entity.
    Item(EntityId),
    /// A query with no parameters.
    Whole,
}

/// `(query name, part)`; invalidation works on the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    name: String,
    part: QueryPart,
}

impl QueryKey {
    pub fn list(name: impl Into<String>, params: &QueryParams) -> Self {
        Self {
            name: name.into(),
            part: QueryPart::List(params.to_json().to_string()),
        }
    }

    pub fn item(name: impl Into<String>, id: EntityId) -> Self {
        Self {
            name: name.into(),
            part: QueryPart::Item(id),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            part: QueryPart::Whole,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn part(&self) -> &QueryPart {
        &self.part
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    invalidated: bool,
}

/// Shared cache of query results.
///
/// Entries stay fresh until invalidated, or until `stale_time` has
/// elapsed when one is set. Stale entries are kept but never served.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
    stale_time: Option<Duration>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = Some(stale_time);
        self
    }

    /// Fresh value under `key`.
    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if self.entry_is_stale(entry) {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: QueryKey, value: Value) {
        self.entries.write().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                invalidated: false,
            },
        );
    }

    /// Mark every entry under `name` stale; returns how many were marked.
    pub fn invalidate(&self, name: &str) -> usize {
        let mut entries = self.entries.write();
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.name == name && !entry.invalidated {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!(query = name, count, "Invalidated queries");
        count
    }

    /// True when `key` is missing or would not be served.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .get(key)
            .map_or(true, |entry| self.entry_is_stale(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn entry_is_stale(&self, entry: &CacheEntry) -> bool {
        entry.invalidated
            || self
                .stale_time
                .is_some_and(|stale_time| entry.stored_at.elapsed() >= stale_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_keys_follow_params() {
        let a = QueryKey::list("Todo", &QueryParams::new().with_page(1));
        let b = QueryKey::list("Todo", &QueryParams::new().with_page(2));
        assert_ne!(a, b);
        assert_eq!(a, QueryKey::list("Todo", &QueryParams::new().with_page(1)));
    }

    #[test]
    fn invalidate_only_touches_its_name() {
        let cache = QueryCache::new();
        let todo = QueryKey::item("Todo", EntityId::from("a1"));
        let todos = QueryKey::list("Todo", &QueryParams::new());
        let cat = QueryKey::item("Cat", EntityId::Int(1));
        cache.set(todo.clone(), json!({"title": "x"}));
        cache.set(todos.clone(), json!({"data": []}));
        cache.set(cat.clone(), json!({"name": "Abyssinian"}));

        assert_eq!(cache.invalidate("Todo"), 2);
        assert!(cache.get(&todo).is_none());
        assert!(cache.is_stale(&todos));
        assert_eq!(cache.get(&cat), Some(json!({"name": "Abyssinian"})));
        assert_eq!(cache.len(), 3);

        // Already stale entries are not counted again.
        assert_eq!(cache.invalidate("Todo"), 0);
    }

    #[test]
    fn set_refreshes_invalidated_entry() {
        let cache = QueryCache::new();
        let key = QueryKey::named("randomCat");
        cache.set(key.clone(), json!(1));
        cache.invalidate("randomCat");
        cache.set(key.clone(), json!(2));
        assert_eq!(cache.get(&key), Some(json!(2)));
    }

    #[test]
    fn zero_stale_time_never_serves() {
        let cache = QueryCache::new().with_stale_time(Duration::ZERO);
        let key = QueryKey::named("randomCat");
        cache.set(key.clone(), json!(1));
        assert!(cache.get(&key).is_none());
        assert!(!cache.is_empty());
    }
}
