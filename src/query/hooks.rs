//! Cached CRUD queries for one resource.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::cache::{QueryCache, QueryKey};
use crate::api::{ApiClient, ApiError, ApiResult, EntityService, ListPage, RestService};
use crate::store::{Entity, EntityId, QueryParams};

/// Identity field used when none is configured.
pub const DEFAULT_KEY_FIELD: &str = "_id";

/// Construction parameters of [`QueryHooks`].
pub struct QueryConfig {
    /// Query name; every key of the resource starts with it.
    pub name: String,
    /// Field holding an item's identity in payloads.
    pub key_field: String,
    pub service: Arc<dyn EntityService>,
}

impl QueryConfig {
    pub fn new(name: impl Into<String>, client: &ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
            service: Arc::new(RestService::new(client.clone(), endpoint)),
        }
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    pub fn with_service(mut self, service: Arc<dyn EntityService>) -> Self {
        self.service = service;
        self
    }
}

/// Cache-backed CRUD calls. Mutations invalidate every query of the
/// resource; reads serve fresh cache entries and fetch otherwise.
pub struct QueryHooks<T> {
    name: String,
    key_field: String,
    service: Arc<dyn EntityService>,
    cache: QueryCache,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for QueryHooks<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            key_field: self.key_field.clone(),
            service: self.service.clone(),
            cache: self.cache.clone(),
            _marker: PhantomData,
        }
    }
}

pub fn build_query_hooks<T: Entity>(config: QueryConfig, cache: &QueryCache) -> QueryHooks<T> {
    QueryHooks {
        name: config.name,
        key_field: config.key_field,
        service: config.service,
        cache: cache.clone(),
        _marker: PhantomData,
    }
}

impl<T: Entity> QueryHooks<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// One page of the list; every item is also cached on its own.
    pub async fn get_all(&self, params: QueryParams) -> ApiResult<ListPage<T>> {
        let key = QueryKey::list(&self.name, &params);
        if let Some(cached) = self.cache.get(&key) {
            debug!(query = %self.name, "List served from cache");
            return ListPage::from_value(cached);
        }

        let envelope = self.service.get_all(params).await?.ensure_success()?;
        let page = ListPage::from_value(envelope.data.clone())?;
        if let Some(items) = envelope.data.get("data").and_then(Value::as_array) {
            for item in items {
                if let Some(id) = item.get(&self.key_field).and_then(EntityId::from_value) {
                    self.cache.set(QueryKey::item(&self.name, id), item.clone());
                }
            }
        }
        self.cache.set(key, envelope.data);
        Ok(page)
    }

    /// One item; `None` disables the query.
    pub async fn get_one(&self, id: Option<EntityId>) -> ApiResult<Option<T>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let key = QueryKey::item(&self.name, id.clone());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(T::deserialize(cached)?));
        }

        let envelope = self.service.get_one(id).await?.ensure_success()?;
        let item = envelope.decode_data::<T>()?;
        self.cache.set(key, envelope.data);
        Ok(Some(item))
    }

    pub async fn create_one(&self, payload: Value) -> ApiResult<T> {
        let envelope = self.service.create_one(payload).await?.ensure_success()?;
        let item = envelope.decode_data()?;
        self.cache.invalidate(&self.name);
        Ok(item)
    }

    /// Update the item named by the payload's key field.
    pub async fn update_one(&self, payload: Value) -> ApiResult<T> {
        let id = payload
            .get(&self.key_field)
            .and_then(EntityId::from_value)
            .ok_or_else(|| ApiError::MissingIdentity(self.key_field.clone()))?;
        let envelope = self.service.update_one(id, payload).await?.ensure_success()?;
        let item = envelope.decode_data()?;
        self.cache.invalidate(&self.name);
        Ok(item)
    }

    /// Delete one item; returns the server's `data`.
    pub async fn delete_one(&self, id: EntityId) -> ApiResult<Value> {
        let envelope = self.service.delete_one(id).await?.ensure_success()?;
        self.cache.invalidate(&self.name);
        Ok(envelope.data)
    }
}
