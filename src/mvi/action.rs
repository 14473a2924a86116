//! Base trait for actions in the unidirectional flow.

/// Marker trait for action objects.
///
/// Actions represent:
/// - Optimistic updates issued before a request starts
/// - Request completions (success or failure)
/// - Store-specific events added by extensions
///
/// Actions are processed by reducers to produce new states.
pub trait Action: Send + 'static {}
