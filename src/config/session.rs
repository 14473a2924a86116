//! Client session: credentials plus what to do when the API rejects them.

use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::{
    AuthType, CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SecureString, ACCESS_TOKEN_KEY,
};
use super::types::SessionConfig;

type AuthFailureHook = Arc<dyn Fn() + Send + Sync>;

/// Auth context handed to every request.
///
/// On a 401/403 the request executor calls [`Session::handle_auth_failure`],
/// which clears the credential store and then runs the optional hook.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
    auth_type: AuthType,
    on_auth_failure: Option<AuthFailureHook>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>, auth_type: AuthType) -> Self {
        Self {
            store,
            auth_type,
            on_auth_failure: None,
        }
    }

    /// Bearer session backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()), AuthType::Bearer)
    }

    /// Build the session described by `[session]` in the config.
    pub fn from_config(config: &SessionConfig) -> Result<Self, CredentialError> {
        let store: Arc<dyn CredentialStore> = match config.credentials_path() {
            Some(path) => Arc::new(FileCredentialStore::open(path)?),
            None => Arc::new(MemoryCredentialStore::new()),
        };
        Ok(Self::new(store, config.auth_type()))
    }

    /// Run `hook` after credentials are cleared on an auth failure.
    pub fn with_auth_failure_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_auth_failure = Some(Arc::new(hook));
        self
    }

    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    pub fn access_token(&self) -> Option<SecureString> {
        self.store
            .get(ACCESS_TOKEN_KEY)
            .filter(|token| !token.expose().is_empty())
    }

    pub fn set_access_token(&self, token: SecureString) -> Result<(), CredentialError> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    /// Drop every stored credential, then notify the hook.
    pub fn handle_auth_failure(&self) {
        match self.store.clear() {
            Ok(()) => info!("Credentials cleared after authentication failure"),
            Err(e) => warn!(error = %e, "Failed to clear credentials"),
        }
        if let Some(hook) = &self.on_auth_failure {
            hook();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_type", &self.auth_type)
            .field("has_token", &self.access_token().is_some())
            .finish()
    }
}
