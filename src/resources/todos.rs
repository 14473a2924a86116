//! Todos: list store over an endpoint that returns bare arrays, plus a
//! done-status toggle.

use std::sync::Arc;

use futures_core::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::error;

use crate::api::{ApiClient, ApiResult, Envelope, EntityService, RestService};
use crate::query::{build_query_hooks, QueryCache, QueryConfig, QueryHooks};
use crate::request::{LoadingSetter, Outcome};
use crate::store::{
    build_list_store, Entity, EntityId, ItemFlagsPatch, ListAction, ListActions, ListConfig,
    Notifier, QueryParams, StoreHandle,
};

pub const TODO_ENDPOINT: &str = "/todos";

const TODO_QUERY: &str = "Todo";
const TOGGLE_FAILED: &str = "Something went wrong toggling todo done status";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<EntityId>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "isComplete", default)]
    pub is_complete: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Todo {
    fn id(&self) -> Option<EntityId> {
        self.id.clone()
    }

    fn alt_id(&self) -> Option<EntityId> {
        self.alt_id.clone()
    }

    fn assign_id(&mut self, id: &EntityId) {
        self.id = Some(id.clone());
        self.alt_id = Some(id.clone());
    }
}

/// Todo REST calls. The list endpoint answers with a bare array, which
/// is wrapped into the `{ data: [...] }` shape every list store expects.
#[derive(Debug, Clone)]
pub struct TodoService {
    rest: RestService,
}

impl TodoService {
    pub fn new(client: &ApiClient, endpoint: &str) -> Self {
        Self {
            rest: RestService::new(client.clone(), endpoint),
        }
    }
}

impl EntityService for TodoService {
    fn rest(&self) -> &RestService {
        &self.rest
    }

    fn get_all(&self, params: QueryParams) -> BoxFuture<'_, ApiResult<Envelope>> {
        Box::pin(async move {
            let mut envelope = self
                .rest
                .client()
                .get(self.rest.endpoint(), Some(&params))
                .await?;
            if envelope.data.is_array() {
                envelope.data = json!({ "data": envelope.data.take() });
            }
            Ok(envelope)
        })
    }
}

/// Todo list store with the toggle action.
#[derive(Clone)]
pub struct TodoStore {
    actions: ListActions<Todo>,
    client: ApiClient,
    endpoint: String,
}

impl TodoStore {
    pub fn new(client: &ApiClient, endpoint: &str, notifier: Arc<dyn Notifier>) -> Self {
        let config = ListConfig::new(TODO_QUERY, client, endpoint)
            .with_service(Arc::new(TodoService::new(client, endpoint)))
            .with_notifier(notifier);
        let (_, actions) = build_list_store(config);
        Self {
            actions,
            client: client.clone(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn actions(&self) -> &ListActions<Todo> {
        &self.actions
    }

    pub fn store(&self) -> &StoreHandle<Todo> {
        self.actions.store()
    }

    /// `PATCH {endpoint}/toggle/status/{id}`; the server's copy replaces the stored one.
    pub async fn toggle_todo_done_status(
        &self,
        id: EntityId,
        set_loading: Option<LoadingSetter<'_>>,
    ) -> Outcome {
        let store = self.store();
        let seq = store.next_seq();
        store.dispatch(ListAction::SetOneItemLoading {
            id: id.clone(),
            patch: ItemFlagsPatch::loading(true),
        });

        let path = toggle_path(&self.endpoint, &id);
        self.actions
            .handler()
            .run(
                || self.client.patch(&path, None),
                |envelope| {
                    store.dispatch(ListAction::GetOneSuccess {
                        entity: envelope.decode_data()?,
                        seq,
                    });
                    Ok(())
                },
                |message| {
                    error!(%id, %message, "Error toggling todo done status");
                    self.actions.notifier().error(TOGGLE_FAILED);
                    store.dispatch(ListAction::SetOneItemLoading {
                        id: id.clone(),
                        patch: ItemFlagsPatch::loading(false).with_error(message),
                    });
                },
                set_loading,
            )
            .await
    }
}

fn toggle_path(endpoint: &str, id: &EntityId) -> String {
    format!("{}/toggle/status/{}", endpoint, id)
}

/// Cached todo queries, keyed by `_id`.
pub fn build_todo_queries(client: &ApiClient, endpoint: &str, cache: &QueryCache) -> QueryHooks<Todo> {
    build_query_hooks(
        QueryConfig::new(TODO_QUERY, client, endpoint)
            .with_service(Arc::new(TodoService::new(client, endpoint))),
        cache,
    )
}

/// Toggle through the query layer; every todo query goes stale.
pub async fn toggle_todo(
    client: &ApiClient,
    cache: &QueryCache,
    endpoint: &str,
    id: &EntityId,
) -> ApiResult<Todo> {
    let envelope = client
        .patch(&toggle_path(endpoint, id), None)
        .await?
        .ensure_success()?;
    let todo = envelope.decode_data()?;
    cache.invalidate(TODO_QUERY);
    Ok(todo)
}
