//! Query-cache flavour of the resource API.
//!
//! Where the list store keeps normalized state and request flags, the
//! query layer caches raw responses by key and drops them wholesale on
//! any mutation of the same resource.

mod cache;
mod hooks;

pub use cache::{QueryCache, QueryKey, QueryPart};
pub use hooks::{build_query_hooks, QueryConfig, QueryHooks, DEFAULT_KEY_FIELD};
