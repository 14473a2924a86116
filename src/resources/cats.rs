//! Cats: list store plus a "random cat" slot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;

use crate::api::{ApiClient, ApiResult};
use crate::query::{build_query_hooks, QueryCache, QueryConfig, QueryHooks, QueryKey};
use crate::request::{LoadingSetter, Outcome};
use crate::store::{
    build_list_store, Entity, EntityEntry, EntityId, ListAction, ListActions, ListConfig,
    ListState, Notifier, StoreExtension, StoreHandle,
};

pub const CAT_ENDPOINT: &str = "/public/cats";

const RANDOM_FAILED: &str = "Something went wrong fetching random cat details";
const RANDOM_QUERY: &str = "randomCat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
    /// Breed ratings and other fields passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Cat {
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

/// Extension state of the cat store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomCatState {
    pub random_cat_id: Option<EntityId>,
    pub random_cat_loading: bool,
    pub random_cat_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CatAction {
    SetRandomLoading { loading: bool, error: Option<String> },
    GetRandomSuccess(Cat),
}

impl StoreExtension<Cat> for RandomCatState {
    type Action = CatAction;

    fn reduce(mut state: ListState<Cat, Self>, action: CatAction) -> ListState<Cat, Self> {
        match action {
            CatAction::SetRandomLoading { loading, error } => {
                state.extra.random_cat_loading = loading;
                state.extra.random_cat_error = error;
            }
            CatAction::GetRandomSuccess(mut cat) => {
                // The random endpoint keys by `id`, so it wins here.
                let id = cat.id.clone().or_else(|| cat.alt_id.clone());
                if let Some(id) = &id {
                    cat.assign_id(id);
                    state.map.insert(id.clone(), Some(EntityEntry::fresh(cat, 0)));
                }
                state.extra.random_cat_id = id;
                state.extra.random_cat_loading = false;
            }
        }
        state
    }
}

/// Cat list store with the random-cat action.
#[derive(Clone)]
pub struct CatStore {
    actions: ListActions<Cat, RandomCatState>,
    client: ApiClient,
    endpoint: String,
}

impl CatStore {
    pub fn new(client: &ApiClient, endpoint: &str, notifier: Arc<dyn Notifier>) -> Self {
        let config = ListConfig::new("Cat", client, endpoint).with_notifier(notifier);
        let (_, actions) = build_list_store(config);
        Self {
            actions,
            client: client.clone(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn actions(&self) -> &ListActions<Cat, RandomCatState> {
        &self.actions
    }

    pub fn store(&self) -> &StoreHandle<Cat, RandomCatState> {
        self.actions.store()
    }

    /// The cat fetched by the last successful `get_one_random_cat`.
    pub fn random_cat(&self) -> Option<Cat> {
        self.store().read(|state| {
            let id = state.extra.random_cat_id.as_ref()?;
            state.entity(id).cloned()
        })
    }

    /// `GET {endpoint}/cat/random` into the random-cat slot.
    pub async fn get_one_random_cat(&self, set_loading: Option<LoadingSetter<'_>>) -> Outcome {
        let store = self.store();
        store.dispatch(ListAction::Custom(CatAction::SetRandomLoading {
            loading: true,
            error: None,
        }));

        let path = random_path(&self.endpoint);
        self.actions
            .handler()
            .run(
                || self.client.get(&path, None),
                |envelope| {
                    store.dispatch(ListAction::Custom(CatAction::GetRandomSuccess(
                        envelope.decode_data()?,
                    )));
                    Ok(())
                },
                |message| {
                    error!(%message, "Error fetching random cat");
                    self.actions.notifier().error(RANDOM_FAILED);
                    store.dispatch(ListAction::Custom(CatAction::SetRandomLoading {
                        loading: false,
                        error: Some(message),
                    }));
                },
                set_loading,
            )
            .await
    }
}

fn random_path(endpoint: &str) -> String {
    format!("{}/cat/random", endpoint)
}

/// Cached cat queries, keyed by `id`.
pub fn build_cat_queries(client: &ApiClient, endpoint: &str, cache: &QueryCache) -> QueryHooks<Cat> {
    build_query_hooks(
        QueryConfig::new("Cat", client, endpoint).with_key_field("id"),
        cache,
    )
}

/// Random cat through the query cache, kept until invalidated.
pub async fn get_random_cat(
    client: &ApiClient,
    cache: &QueryCache,
    endpoint: &str,
) -> ApiResult<Cat> {
    let key = QueryKey::named(RANDOM_QUERY);
    if let Some(cached) = cache.get(&key) {
        return Ok(Cat::deserialize(cached)?);
    }

    let envelope = client.get(&random_path(endpoint), None).await?.ensure_success()?;
    let cat = envelope.decode_data::<Cat>()?;
    cache.set(key, envelope.data);
    Ok(cat)
}
