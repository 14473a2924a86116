//! Uniform loading / success / error lifecycle for API calls.
//!
//! [`RequestHandler::run`] raises the loading flag, awaits the call,
//! routes the envelope to exactly one of the callbacks and lowers the
//! flag on every exit path. A 401/403 clears the session's credentials
//! before the error callback fires.

use std::future::Future;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{ApiError, ApiResult, Envelope};
use crate::config::Session;

/// Callback toggled around a request.
pub type LoadingSetter<'a> = &'a (dyn Fn(bool) + Sync);

/// How a request settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    /// Failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Succeeded => None,
            Outcome::Failed(message) => Some(message),
        }
    }
}

/// Runs API calls on behalf of a session.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    session: Session,
}

impl RequestHandler {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Execute `api` once.
    ///
    /// `on_success` receives a successful envelope and may still fail
    /// (typically while decoding `data`); that failure is routed to
    /// `on_error` like any other. An envelope with `success: false` is a
    /// failure carrying the server's message. `set_loading` sees exactly
    /// one `true` followed by one `false`.
    pub async fn run<A, Fut, S, E>(
        &self,
        api: A,
        on_success: S,
        on_error: E,
        set_loading: Option<LoadingSetter<'_>>,
    ) -> Outcome
    where
        A: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<Envelope>>,
        S: FnOnce(Envelope) -> ApiResult<()>,
        E: FnOnce(String),
    {
        let request_id = Uuid::new_v4();
        if let Some(set) = set_loading {
            set(true);
        }
        let _loading = scopeguard::guard(set_loading, |setter| {
            if let Some(set) = setter {
                set(false);
            }
        });

        debug!(%request_id, "Request started");
        let result = api()
            .await
            .and_then(Envelope::ensure_success)
            .and_then(on_success);

        match result {
            Ok(()) => {
                debug!(%request_id, "Request succeeded");
                Outcome::Succeeded
            }
            Err(err) => {
                self.handle_failure(request_id, &err);
                let message = err.user_message();
                on_error(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    fn handle_failure(&self, request_id: Uuid, err: &ApiError) {
        if err.is_auth_failure() {
            warn!(%request_id, status = ?err.status(), "Authentication failure, clearing credentials");
            self.session.handle_auth_failure();
        } else {
            warn!(%request_id, error = %err, "Request failed");
        }
    }
}
