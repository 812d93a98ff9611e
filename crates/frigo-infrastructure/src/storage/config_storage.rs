//! Persistence for the application configuration.

use frigo_core::config::AppConfig;
use frigo_core::error::Result;

use crate::paths::FrigoPaths;
use crate::storage::atomic_file::AtomicTomlFile;

/// Stores the application configuration in `config.toml`.
pub struct ConfigStorage {
    file: AtomicTomlFile<AppConfig>,
}

impl ConfigStorage {
    pub fn new(paths: &FrigoPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// Loads the configuration; a missing file yields the default.
    pub fn load(&self) -> Result<AppConfig> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config)
    }
}
