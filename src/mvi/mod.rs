//! Unidirectional state primitives.
//!
//! Every store in this crate follows the same flow:
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                                 │
//!    └─────────────────────────────────┘
//! ```
//!
//! - **State**: Cloneable snapshot of everything a caller can read
//! - **Action**: Request-lifecycle events (loading, success, failure)
//! - **Reducer**: Pure function that transforms state based on actions

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::StoreState;
