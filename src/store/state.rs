//! State tree of a list store.

use std::collections::HashMap;

use serde_json::Value;

use super::board::{board_key, Board, QueryParams};
use super::entity::{Entity, EntityId};
use super::reducer::StoreExtension;
use crate::mvi::StoreState;

/// Transient request flags attached to a stored entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFlags {
    pub loading: bool,
    pub saving: bool,
    pub deleting: bool,
    pub error: Option<String>,
}

/// Partial update of [`ItemFlags`]; unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFlagsPatch {
    pub loading: Option<bool>,
    pub saving: Option<bool>,
    pub deleting: Option<bool>,
    pub error: Option<String>,
}

impl ItemFlagsPatch {
    pub fn loading(value: bool) -> Self {
        Self {
            loading: Some(value),
            ..Self::default()
        }
    }

    pub fn saving(value: bool) -> Self {
        Self {
            saving: Some(value),
            ..Self::default()
        }
    }

    pub fn deleting(value: bool) -> Self {
        Self {
            deleting: Some(value),
            ..Self::default()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub(crate) fn apply(self, flags: &mut ItemFlags) {
        if let Some(loading) = self.loading {
            flags.loading = loading;
        }
        if let Some(saving) = self.saving {
            flags.saving = saving;
        }
        if let Some(deleting) = self.deleting {
            flags.deleting = deleting;
        }
        if let Some(error) = self.error {
            flags.error = Some(error);
        }
    }
}

/// A stored entity with its request flags.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityEntry<T> {
    /// Last known server data. `None` when only flags were ever set.
    pub data: Option<T>,
    pub flags: ItemFlags,
    /// Sequence number of the last applied single-entity fetch.
    pub applied_seq: u64,
}

impl<T> EntityEntry<T> {
    pub fn fresh(data: T, applied_seq: u64) -> Self {
        Self {
            data: Some(data),
            flags: ItemFlags::default(),
            applied_seq,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            data: None,
            flags: ItemFlags::default(),
            applied_seq: 0,
        }
    }
}

/// Draft of an entity being created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub draft: Value,
    pub saving: bool,
    pub error: Option<String>,
}

/// State of a list store: entity map, boards, the create slot and
/// store-specific extension fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T, X = ()> {
    /// Identity → entry. `None` marks a deleted entity; the key is kept
    /// so "deleted" stays distinguishable from "never fetched".
    pub map: HashMap<EntityId, Option<EntityEntry<T>>>,
    /// Identity → sequence number of the request that deleted it.
    /// Responses issued before the delete cannot bring the entity back.
    pub tombstones: HashMap<EntityId, u64>,
    /// Board key → cached pages.
    pub boards: HashMap<String, Board>,
    pub new_item: Option<NewItem>,
    pub extra: X,
}

impl<T, X: Default> Default for ListState<T, X> {
    fn default() -> Self {
        Self::with_extra(X::default())
    }
}

impl<T, X> ListState<T, X> {
    pub fn with_extra(extra: X) -> Self {
        Self {
            map: HashMap::new(),
            tombstones: HashMap::new(),
            boards: HashMap::new(),
            new_item: None,
            extra,
        }
    }

    /// Live entry for `id`; `None` if never seen or deleted.
    pub fn entry(&self, id: &EntityId) -> Option<&EntityEntry<T>> {
        self.map.get(id).and_then(Option::as_ref)
    }

    /// Server data for `id`.
    pub fn entity(&self, id: &EntityId) -> Option<&T> {
        self.entry(id).and_then(|entry| entry.data.as_ref())
    }

    /// Whether `id` was deleted (key kept, value cleared).
    pub fn is_deleted(&self, id: &EntityId) -> bool {
        matches!(self.map.get(id), Some(None))
    }

    /// Whether a response with sequence `seq` predates the deletion of `id`.
    pub(crate) fn deleted_after(&self, id: &EntityId, seq: u64) -> bool {
        self.is_deleted(id)
            && self
                .tombstones
                .get(id)
                .is_some_and(|deleted_at| seq < *deleted_at)
    }

    pub fn board(&self, params: &QueryParams) -> Option<&Board> {
        self.boards.get(&board_key(params))
    }

    /// Entities on the page selected by `params`, skipping deleted ones.
    pub fn page_items(&self, params: &QueryParams) -> Vec<&T> {
        let Some(board) = self.board(params) else {
            return Vec::new();
        };
        board
            .page(params.page_or_default())
            .iter()
            .filter_map(|id| self.entity(id))
            .collect()
    }
}

impl<T: Entity, X: StoreExtension<T>> StoreState for ListState<T, X> {}
