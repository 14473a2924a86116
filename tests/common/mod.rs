//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use parking_lot::Mutex;
use reusable_state::api::ApiClient;
use reusable_state::config::{ApiConfig, Session};
use reusable_state::store::Notifier;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Notifier that keeps every message for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Client against `base_url` with an in-memory bearer session.
pub fn client(base_url: &str) -> ApiClient {
    client_with_session(base_url, Session::in_memory())
}

pub fn client_with_session(base_url: &str, session: Session) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
    };
    ApiClient::new(&config, session).expect("Failed to build client")
}

/// Records every loading toggle.
#[derive(Default, Clone)]
pub struct LoadingSpy {
    calls: Arc<Mutex<Vec<bool>>>,
}

impl LoadingSpy {
    pub fn setter(&self) -> impl Fn(bool) + Sync + '_ {
        move |value| self.calls.lock().push(value)
    }

    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().clone()
    }
}

/// Write `content` as a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
