//! Wiring of the configured client, stores and query hooks.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::config::{Config, ConfigError, ConfigStore, CredentialError, Session};
use crate::query::{QueryCache, QueryHooks};
use crate::resources::{
    build_cat_queries, build_dog_queries, build_dog_store, build_todo_queries, Cat, CatStore,
    Dog, Todo, TodoStore,
};
use crate::store::{ListActions, Notifier};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open credential store: {0}")]
    Credentials(#[from] CredentialError),

    #[error("Failed to build API client: {0}")]
    Client(#[from] ApiError),
}

/// Cached query hooks of every resource, sharing one cache.
#[derive(Clone)]
pub struct Queries {
    pub cache: QueryCache,
    pub cats: QueryHooks<Cat>,
    pub dogs: QueryHooks<Dog>,
    pub todos: QueryHooks<Todo>,
}

/// Everything a front end needs, built from one config.
#[derive(Clone)]
pub struct AppContext {
    config: ConfigStore,
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    pub cats: CatStore,
    pub dogs: ListActions<Dog>,
    pub todos: TodoStore,
    pub queries: Queries,
}

impl AppContext {
    /// Load the config at `path` (default location when `None`) and build the context.
    pub fn load(path: Option<PathBuf>, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let path = path.unwrap_or_else(Config::config_path);
        let config = Config::load_from(&path)?;
        Self::from_config(ConfigStore::new(config, path), notifier)
    }

    pub fn from_config(config: ConfigStore, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let snapshot = config.get();
        let session = Session::from_config(&snapshot.session)?;
        let client = ApiClient::new(&snapshot.api, session)?;
        let endpoints = &snapshot.resources;
        info!(base_url = %client.base_url(), "API client ready");

        let cache = QueryCache::new();
        let queries = Queries {
            cats: build_cat_queries(&client, &endpoints.cats, &cache),
            dogs: build_dog_queries(&client, &endpoints.dogs, &cache),
            todos: build_todo_queries(&client, &endpoints.todos, &cache),
            cache,
        };

        Ok(Self {
            cats: CatStore::new(&client, &endpoints.cats, notifier.clone()),
            dogs: build_dog_store(&client, &endpoints.dogs, notifier.clone()),
            todos: TodoStore::new(&client, &endpoints.todos, notifier.clone()),
            queries,
            config,
            client,
            notifier,
        })
    }

    /// Re-read the config file and, if it changed, build a fresh context.
    ///
    /// Stores and caches of the returned context start empty. `None` when
    /// the file is unchanged; an invalid file is an error and the current
    /// config stays in effect.
    pub fn reload(&self) -> Result<Option<Self>, AppError> {
        if !self.config.reload()? {
            return Ok(None);
        }
        Self::from_config(self.config.clone(), self.notifier.clone()).map(Some)
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }
}
