//! Dogs: a plain list store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::ApiClient;
use crate::query::{build_query_hooks, QueryCache, QueryConfig, QueryHooks};
use crate::store::{build_list_store, Entity, EntityId, ListActions, ListConfig, Notifier};

pub const DOG_ENDPOINT: &str = "/public/dogs";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(default)]
    pub imperial: String,
    #[serde(default)]
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bred_for: Option<String>,
    #[serde(default)]
    pub breed_group: Option<String>,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub height: Option<Measure>,
    #[serde(default)]
    pub weight: Option<Measure>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Dog {
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

pub fn build_dog_store(
    client: &ApiClient,
    endpoint: &str,
    notifier: Arc<dyn Notifier>,
) -> ListActions<Dog> {
    let config = ListConfig::new("Dog", client, endpoint).with_notifier(notifier);
    build_list_store(config).1
}

pub fn build_dog_queries(client: &ApiClient, endpoint: &str, cache: &QueryCache) -> QueryHooks<Dog> {
    build_query_hooks(
        QueryConfig::new("Dog", client, endpoint).with_key_field("id"),
        cache,
    )
}
