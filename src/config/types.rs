use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::credentials::AuthType;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
}

/// REST API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Credential handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Authentication type: "bearer" or "none".
    #[serde(rename = "auth_type", default = "default_auth_type")]
    pub auth_type_str: String,
    /// Where credentials persist. In-memory when unset.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

/// Endpoint of each resource, relative to `api.base_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default = "default_cats_endpoint")]
    pub cats: String,
    #[serde(default = "default_dogs_endpoint")]
    pub dogs: String,
    #[serde(default = "default_todos_endpoint")]
    pub todos: String,
}

fn default_base_url() -> String {
    "https://api.freeapi.app/api/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_auth_type() -> String {
    "bearer".to_string()
}

fn default_cats_endpoint() -> String {
    "/public/cats".to_string()
}

fn default_dogs_endpoint() -> String {
    "/public/dogs".to_string()
}

fn default_todos_endpoint() -> String {
    "/todos".to_string()
}

impl SessionConfig {
    pub fn auth_type(&self) -> AuthType {
        AuthType::parse(&self.auth_type_str)
    }

    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path.clone()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_type_str: default_auth_type(),
            credentials_path: None,
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            cats: default_cats_endpoint(),
            dogs: default_dogs_endpoint(),
            todos: default_todos_endpoint(),
        }
    }
}
