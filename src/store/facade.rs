//! Binding of the list reducer to a dispatcher and the CRUD actions.
//!
//! [`build_list_store`] returns a [`StoreHandle`] (read state, dispatch,
//! subscribe) and a [`ListActions`] (the five request-driven actions).
//! Store-specific actions are built on top of both by the resource
//! modules.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, error};

use super::action::ListAction;
use super::board::{BoardPatch, QueryParams};
use super::entity::{Entity, EntityId};
use super::notify::{Notifier, TracingNotifier};
use super::reducer::{ListReducer, StoreExtension};
use super::state::{ItemFlagsPatch, ListState};
use crate::api::{ApiClient, EntityService, RestService};
use crate::mvi::Reducer;
use crate::request::{LoadingSetter, Outcome, RequestHandler};

pub const SAVE_FAILED: &str = "Something went wrong while saving data!";
pub const LIST_FAILED: &str = "Something went wrong fetching list data!";
pub const FETCH_FAILED: &str = "Something went wrong while fetching!";
pub const DELETE_FAILED: &str = "Something went wrong while deleting!";

/// Construction parameters of a list store.
pub struct ListConfig<X> {
    /// Logical name used in logs.
    pub name: String,
    pub service: Arc<dyn EntityService>,
    pub handler: RequestHandler,
    pub notifier: Arc<dyn Notifier>,
    /// Initial extension state.
    pub init_state: X,
}

impl<X: Default> ListConfig<X> {
    /// REST defaults against `endpoint`, logging notifier.
    pub fn new(name: impl Into<String>, client: &ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: Arc::new(RestService::new(client.clone(), endpoint)),
            handler: RequestHandler::new(client.session().clone()),
            notifier: Arc::new(TracingNotifier),
            init_state: X::default(),
        }
    }
}

impl<X> ListConfig<X> {
    /// Replace the default REST calls.
    pub fn with_service(mut self, service: Arc<dyn EntityService>) -> Self {
        self.service = service;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_init_state(mut self, init_state: X) -> Self {
        self.init_state = init_state;
        self
    }
}

/// Shared handle on a store's state.
///
/// Every dispatch runs the reducer to completion inside the watch
/// channel, so transitions are applied one at a time.
pub struct StoreHandle<T, X = ()> {
    name: Arc<str>,
    state: Arc<watch::Sender<ListState<T, X>>>,
    seq: Arc<AtomicU64>,
}

impl<T, X> Clone for StoreHandle<T, X> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: self.state.clone(),
            seq: self.seq.clone(),
        }
    }
}

impl<T: Entity, X: StoreExtension<T>> StoreHandle<T, X> {
    pub fn new(name: impl Into<Arc<str>>, init_state: X) -> Self {
        let (state, _) = watch::channel(ListState::with_extra(init_state));
        Self {
            name: name.into(),
            state: Arc::new(state),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ListState<T, X> {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ListState<T, X>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListState<T, X>> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, action: ListAction<T, X::Action>) {
        debug!(store = %self.name, action = action.name(), "dispatch");
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = ListReducer::<T, X>::reduce(current, action);
        });
    }

    /// Next request sequence number; strictly increasing per store.
    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// The request-driven actions of a list store.
pub struct ListActions<T, X = ()> {
    store: StoreHandle<T, X>,
    service: Arc<dyn EntityService>,
    handler: RequestHandler,
    notifier: Arc<dyn Notifier>,
}

impl<T, X> Clone for ListActions<T, X> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            service: self.service.clone(),
            handler: self.handler.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

/// Build a store and its actions from `config`.
pub fn build_list_store<T: Entity, X: StoreExtension<T>>(
    config: ListConfig<X>,
) -> (StoreHandle<T, X>, ListActions<T, X>) {
    let store = StoreHandle::new(config.name, config.init_state);
    let actions = ListActions {
        store: store.clone(),
        service: config.service,
        handler: config.handler,
        notifier: config.notifier,
    };
    (store, actions)
}

impl<T: Entity, X: StoreExtension<T>> ListActions<T, X> {
    pub fn store(&self) -> &StoreHandle<T, X> {
        &self.store
    }

    pub fn service(&self) -> &dyn EntityService {
        self.service.as_ref()
    }

    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Create an entity from `data`.
    pub async fn create_one(&self, data: Value, set_loading: Option<LoadingSetter<'_>>) -> Outcome {
        let store = &self.store;
        store.dispatch(ListAction::CreateOne(data.clone()));

        self.handler
            .run(
                || self.service.create_one(data),
                |envelope| {
                    store.dispatch(ListAction::CreateOneSuccess(envelope.decode_data()?));
                    Ok(())
                },
                |message| {
                    error!(store = %store.name(), %message, "Error creating item");
                    self.notifier.error(SAVE_FAILED);
                    store.dispatch(ListAction::CreateOneFailure(message));
                },
                set_loading,
            )
            .await
    }

    /// Fetch one page of the list selected by `params`.
    pub async fn get_all(
        &self,
        params: QueryParams,
        set_loading: Option<LoadingSetter<'_>>,
    ) -> Outcome {
        let store = &self.store;
        let seq = store.next_seq();
        store.dispatch(ListAction::SetAllItemsLoading {
            params: params.clone(),
            patch: BoardPatch::loading(),
        });

        self.handler
            .run(
                || self.service.get_all(params.clone()),
                |envelope| {
                    let page = envelope.into_list::<T>()?;
                    store.dispatch(ListAction::GetAllSuccess {
                        params: params.clone(),
                        data: page.items,
                        meta_data: page.meta_data,
                        seq,
                    });
                    Ok(())
                },
                |message| {
                    error!(store = %store.name(), %message, "Error fetching list");
                    self.notifier.error(LIST_FAILED);
                    store.dispatch(ListAction::SetAllItemsLoading {
                        params: params.clone(),
                        patch: BoardPatch::failed(message),
                    });
                },
                set_loading,
            )
            .await
    }

    /// Fetch one entity.
    pub async fn get_one(&self, id: EntityId, set_loading: Option<LoadingSetter<'_>>) -> Outcome {
        let store = &self.store;
        let seq = store.next_seq();
        store.dispatch(ListAction::SetOneItemLoading {
            id: id.clone(),
            patch: ItemFlagsPatch::loading(true),
        });

        self.handler
            .run(
                || self.service.get_one(id.clone()),
                |envelope| {
                    store.dispatch(ListAction::GetOneSuccess {
                        entity: envelope.decode_data()?,
                        seq,
                    });
                    Ok(())
                },
                |message| {
                    error!(store = %store.name(), %id, %message, "Error fetching item");
                    self.notifier.error(FETCH_FAILED);
                    store.dispatch(ListAction::SetOneItemLoading {
                        id: id.clone(),
                        patch: ItemFlagsPatch::loading(false).with_error(message),
                    });
                },
                set_loading,
            )
            .await
    }

    /// Update one entity; the stored copy is replaced by the server's.
    pub async fn update_one(
        &self,
        id: EntityId,
        data: Value,
        set_loading: Option<LoadingSetter<'_>>,
    ) -> Outcome {
        let store = &self.store;
        let seq = store.next_seq();
        store.dispatch(ListAction::SetOneItemLoading {
            id: id.clone(),
            patch: ItemFlagsPatch::saving(true),
        });

        self.handler
            .run(
                || self.service.update_one(id.clone(), data),
                |envelope| {
                    store.dispatch(ListAction::GetOneSuccess {
                        entity: envelope.decode_data()?,
                        seq,
                    });
                    Ok(())
                },
                |message| {
                    error!(store = %store.name(), %id, %message, "Error updating item");
                    self.notifier.error(SAVE_FAILED);
                    store.dispatch(ListAction::SetOneItemLoading {
                        id: id.clone(),
                        patch: ItemFlagsPatch::saving(false).with_error(message),
                    });
                },
                set_loading,
            )
            .await
    }

    /// Delete one entity and drop it from every cached page.
    pub async fn delete_one(&self, id: EntityId, set_loading: Option<LoadingSetter<'_>>) -> Outcome {
        let store = &self.store;
        let seq = store.next_seq();
        store.dispatch(ListAction::SetOneItemLoading {
            id: id.clone(),
            patch: ItemFlagsPatch::deleting(true),
        });

        self.handler
            .run(
                || self.service.delete_one(id.clone()),
                |_| {
                    store.dispatch(ListAction::DeleteOneSuccess {
                        id: id.clone(),
                        seq,
                    });
                    Ok(())
                },
                |message| {
                    error!(store = %store.name(), %id, %message, "Error deleting item");
                    self.notifier.error(DELETE_FAILED);
                    store.dispatch(ListAction::SetOneItemLoading {
                        id: id.clone(),
                        patch: ItemFlagsPatch::deleting(false).with_error(message),
                    });
                },
                set_loading,
            )
            .await
    }
}
