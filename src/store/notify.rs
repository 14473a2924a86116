//! User-facing notification side channel.

/// Receives the user-visible failure messages of store actions.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(target: "notify", "{}", message);
    }
}
