//! The list store reducer.

use std::marker::PhantomData;

use tracing::{debug, warn};

use super::action::{ListAction, NoCustomAction};
use super::board::board_key;
use super::entity::{normalize_identity, Entity};
use super::state::{EntityEntry, ListState, NewItem};
use crate::mvi::Reducer;

/// Store-specific state and actions layered over a list store.
///
/// The extension owns `ListState::extra` and handles
/// `ListAction::Custom`. Built-in actions are always handled by
/// [`ListReducer`]; an extension adds transitions, it cannot replace them.
pub trait StoreExtension<T: Entity>: Clone + PartialEq + Default + Send + Sync + 'static {
    type Action: Send + 'static;

    fn reduce(state: ListState<T, Self>, action: Self::Action) -> ListState<T, Self>;
}

impl<T: Entity> StoreExtension<T> for () {
    type Action = NoCustomAction;

    fn reduce(_state: ListState<T, Self>, action: Self::Action) -> ListState<T, Self> {
        match action {}
    }
}

/// Reducer for [`ListState`].
pub struct ListReducer<T, X = ()> {
    _marker: PhantomData<fn() -> (T, X)>,
}

impl<T: Entity, X: StoreExtension<T>> Reducer for ListReducer<T, X> {
    type State = ListState<T, X>;
    type Action = ListAction<T, X::Action>;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            ListAction::CreateOne(draft) => {
                state.new_item = Some(NewItem {
                    draft,
                    saving: true,
                    error: None,
                });
                state
            }
            ListAction::CreateOneSuccess(mut entity) => {
                match normalize_identity(&mut entity) {
                    Some(id) => {
                        state.tombstones.remove(&id);
                        state.map.insert(id, Some(EntityEntry::fresh(entity, 0)));
                    }
                    None => warn!("Created entity has no identity, not stored"),
                }
                state.new_item = None;
                state
            }
            ListAction::CreateOneFailure(error) => {
                let item = state.new_item.get_or_insert_with(|| NewItem {
                    draft: serde_json::Value::Null,
                    saving: false,
                    error: None,
                });
                item.saving = false;
                item.error = Some(error);
                state
            }
            ListAction::SetOneItemLoading { id, patch } => {
                let slot = state.map.entry(id).or_insert(None);
                let entry = slot.get_or_insert_with(EntityEntry::placeholder);
                patch.apply(&mut entry.flags);
                state
            }
            ListAction::GetOneSuccess { mut entity, seq } => {
                let Some(id) = normalize_identity(&mut entity) else {
                    warn!("Fetched entity has no identity, ignored");
                    return state;
                };
                if let Some(Some(existing)) = state.map.get(&id) {
                    if seq < existing.applied_seq {
                        debug!(%id, seq, applied = existing.applied_seq, "Discarding stale entity response");
                        return state;
                    }
                }
                if state.deleted_after(&id, seq) {
                    debug!(%id, seq, "Discarding entity response issued before its deletion");
                    return state;
                }
                state.tombstones.remove(&id);
                state.map.insert(id, Some(EntityEntry::fresh(entity, seq)));
                state
            }
            ListAction::SetAllItemsLoading { params, patch } => {
                let board = state.boards.entry(board_key(&params)).or_default();
                patch.apply(board);
                state
            }
            ListAction::GetAllSuccess {
                params,
                data,
                meta_data,
                seq,
            } => {
                let page = params.page_or_default();
                let applied = state
                    .boards
                    .get(&board_key(&params))
                    .map_or(0, |board| board.page_applied_seq(page));
                if seq < applied {
                    debug!(page, seq, applied, "Discarding stale list response");
                    return state;
                }

                // Entity data from a page is not sequenced against single
                // fetches: the page's copy replaces whatever is stored.
                let mut ids = Vec::with_capacity(data.len());
                for mut item in data {
                    let Some(id) = normalize_identity(&mut item) else {
                        warn!("List item has no identity, skipped");
                        continue;
                    };
                    if state.deleted_after(&id, seq) {
                        debug!(%id, seq, "List item deleted after the fetch, skipped");
                        continue;
                    }
                    ids.push(id.clone());
                    if let Some(Some(entry)) = state.map.get_mut(&id) {
                        entry.data = Some(item);
                    } else {
                        state.tombstones.remove(&id);
                        state.map.insert(id, Some(EntityEntry::fresh(item, 0)));
                    }
                }

                let board = state.boards.entry(board_key(&params)).or_default();
                board.list_map.insert(page, ids);
                board.page_seq.insert(page, seq);
                board.loading = false;
                board.error = None;
                if seq >= board.applied_seq {
                    board.meta_data = meta_data;
                    board.applied_seq = seq;
                }
                state
            }
            ListAction::DeleteOneSuccess { id, seq } => {
                for board in state.boards.values_mut() {
                    for ids in board.list_map.values_mut() {
                        ids.retain(|item| item != &id);
                    }
                }
                state.map.insert(id.clone(), None);
                state.tombstones.insert(id, seq);
                state
            }
            ListAction::Custom(action) => X::reduce(state, action),
        }
    }
}
