mod auth;
mod credentials;
mod loader;
mod session;
mod store;
mod types;

pub use auth::{build_auth_header, AuthHeader};
pub use credentials::{
    AuthType, CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SecureString, ACCESS_TOKEN_KEY,
};
pub use loader::ConfigError;
pub use session::Session;
pub use store::ConfigStore;
pub use types::{ApiConfig, Config, ResourcesConfig, SessionConfig};
