//! Live configuration shared by everything built from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::config::loader::ConfigError;
use crate::config::types::Config;

/// The loaded config and the file it came from.
///
/// Clones share the same config, so a reload is seen by every holder.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Clone of the current config.
    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }

    /// Re-read the file. Returns whether the config changed.
    ///
    /// A file that fails to load or validate leaves the current config
    /// in place.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let config = Config::load_from(&self.path)?;
        let mut current = self.inner.write();
        if *current == config {
            return Ok(false);
        }
        *current = config;
        info!(path = %self.path.display(), "Config reloaded");
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
