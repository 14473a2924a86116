//! Per-resource REST operations.
//!
//! [`EntityService`] provides the five CRUD calls with REST defaults
//! against [`RestService`]. A resource whose API deviates overrides only
//! the calls that differ.

use futures_core::future::BoxFuture;
use serde_json::Value;

use super::client::ApiClient;
use super::envelope::Envelope;
use super::error::ApiResult;
use crate::store::{EntityId, QueryParams};

/// CRUD calls of one resource.
pub trait EntityService: Send + Sync {
    /// Default REST binding the provided methods call through.
    fn rest(&self) -> &RestService;

    /// `GET {endpoint}/{id}`
    fn get_one(&self, id: EntityId) -> BoxFuture<'_, ApiResult<Envelope>> {
        Box::pin(async move {
            let rest = self.rest();
            rest.client().get(&rest.item_path(&id), None).await
        })
    }

    /// `GET {endpoint}?{params}`
    fn get_all(&self, params: QueryParams) -> BoxFuture<'_, ApiResult<Envelope>> {
        Box::pin(async move {
            let rest = self.rest();
            rest.client().get(rest.endpoint(), Some(&params)).await
        })
    }

    /// `POST {endpoint}`
    fn create_one(&self, data: Value) -> BoxFuture<'_, ApiResult<Envelope>> {
        Box::pin(async move {
            let rest = self.rest();
            rest.client().post(rest.endpoint(), &data).await
        })
    }

    /// `PATCH {endpoint}/{id}`
    fn update_one(&self, id: EntityId, data: Value) -> BoxFuture<'_, ApiResult<Envelope>> {
        Box::pin(async move {
            let rest = self.rest();
            rest.client().patch(&rest.item_path(&id), Some(&data)).await
        })
    }

    /// `DELETE {endpoint}/{id}`
    fn delete_one(&self, id: EntityId) -> BoxFuture<'_, ApiResult<Envelope>> {
        Box::pin(async move {
            let rest = self.rest();
            rest.client().delete(&rest.item_path(&id)).await
        })
    }
}

/// REST calls against one endpoint.
#[derive(Debug, Clone)]
pub struct RestService {
    client: ApiClient,
    endpoint: String,
}

impl RestService {
    pub fn new(client: ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/{id}`
    pub fn item_path(&self, id: &EntityId) -> String {
        format!("{}/{}", self.endpoint, id)
    }
}

impl EntityService for RestService {
    fn rest(&self) -> &RestService {
        self
    }
}
