//! Persistence for API secrets used by the direct Gemini variant.

use frigo_core::config::{GeminiConfig, SecretConfig};
use frigo_core::error::Result;

use crate::paths::FrigoPaths;
use crate::storage::atomic_file::AtomicJsonFile;

/// Stores the secret configuration in `secret.json` with 600 permissions.
pub struct SecretStorage {
    file: AtomicJsonFile<SecretConfig>,
}

impl SecretStorage {
    pub fn new(paths: &FrigoPaths) -> Self {
        Self {
            file: AtomicJsonFile::new(paths.secret_file()).with_mode(0o600),
        }
    }

    /// Loads the secret configuration; a missing file yields the default.
    pub fn load(&self) -> Result<SecretConfig> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    pub fn save(&self, config: &SecretConfig) -> Result<()> {
        self.file.save(config)
    }

    /// Creates `secret.json` with an empty template if it does not exist, so
    /// users have a file to fill in.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.file.path().exists() {
            return Ok(());
        }
        self.save(&SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some("gemini-2.5-flash".to_string()),
            }),
        })
    }

    /// The Gemini credentials, when a non-empty key is configured.
    pub fn gemini(&self) -> Result<Option<GeminiConfig>> {
        Ok(self
            .load()?
            .gemini
            .filter(|config| !config.api_key.trim().is_empty()))
    }
}
