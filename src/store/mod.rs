//! Generic entity-list store.
//!
//! A store keeps a normalized entity map, one board per list filter
//! (pages of identities plus pagination metadata), a slot for the
//! entity being created, and request flags per entity and per board.
//!
//! # Architecture
//!
//! ```text
//! ListActions ──→ RequestHandler ──→ EntityService
//!      │                 │
//!      └── dispatch ─────┴──→ ListReducer ──→ ListState ──→ watch::Receiver
//! ```

mod action;
mod board;
mod entity;
mod facade;
mod notify;
mod reducer;
mod state;

pub use action::{ListAction, NoCustomAction};
pub use board::{board_key, Board, BoardPatch, ParamValue, QueryParams, DEFAULT_PAGE};
pub use entity::{normalize_identity, Entity, EntityId, Record};
pub use facade::{
    build_list_store, ListActions, ListConfig, StoreHandle, DELETE_FAILED, FETCH_FAILED,
    LIST_FAILED, SAVE_FAILED,
};
pub use notify::{Notifier, TracingNotifier};
pub use reducer::{ListReducer, StoreExtension};
pub use state::{EntityEntry, ItemFlags, ItemFlagsPatch, ListState, NewItem};
