use serde_json::{Map, Value};

use super::board::{BoardPatch, QueryParams};
use super::entity::{Entity, EntityId};
use super::state::ItemFlagsPatch;
use crate::mvi::Action;

/// Actions understood by every list store.
///
/// `C` carries store-specific actions, handled by the store's
/// [`StoreExtension`](super::reducer::StoreExtension).
#[derive(Debug, Clone)]
pub enum ListAction<T, C = NoCustomAction> {
    /// A draft was submitted for creation.
    CreateOne(Value),
    CreateOneSuccess(T),
    CreateOneFailure(String),
    /// Merge request flags onto one entity.
    SetOneItemLoading { id: EntityId, patch: ItemFlagsPatch },
    /// Fresh server data for one entity.
    GetOneSuccess { entity: T, seq: u64 },
    /// Merge request flags onto the board of `params`.
    SetAllItemsLoading {
        params: QueryParams,
        patch: BoardPatch,
    },
    /// One page of a list query.
    GetAllSuccess {
        params: QueryParams,
        data: Vec<T>,
        meta_data: Map<String, Value>,
        seq: u64,
    },
    /// `id` was deleted by the request numbered `seq`.
    DeleteOneSuccess { id: EntityId, seq: u64 },
    Custom(C),
}

impl<T, C> ListAction<T, C> {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ListAction::CreateOne(_) => "createOne",
            ListAction::CreateOneSuccess(_) => "createOneSuccess",
            ListAction::CreateOneFailure(_) => "createOneFailure",
            ListAction::SetOneItemLoading { .. } => "setOneItemLoading",
            ListAction::GetOneSuccess { .. } => "getOneSuccess",
            ListAction::SetAllItemsLoading { .. } => "setAllItemsLoading",
            ListAction::GetAllSuccess { .. } => "getAllSuccess",
            ListAction::DeleteOneSuccess { .. } => "deleteOneSuccess",
            ListAction::Custom(_) => "custom",
        }
    }
}

impl<T: Entity, C: Send + 'static> Action for ListAction<T, C> {}

/// Custom action type of stores without extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCustomAction {}
