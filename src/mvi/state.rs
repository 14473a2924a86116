//! Base trait for store state.

/// Marker trait for store state objects.
///
/// States should be:
/// - Cloneable (subscribers receive snapshots)
/// - Comparable (PartialEq for detecting changes)
/// - Shareable across tasks (published through a watch channel)
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}
