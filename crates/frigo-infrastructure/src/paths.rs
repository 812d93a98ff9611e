//! Unified path management for Frigo configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/frigo/             # Config directory
//! ├── config.toml              # Application configuration
//! ├── credentials.json         # Persisted auth session (tokens + profile)
//! ├── secret.json              # Gemini API key for the direct variant
//! └── logs/                    # Application logs
//!     └── frigo.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use frigo_core::error::{FrigoError, Result};

const APP_DIR: &str = "frigo";

/// Resolves all file locations under one config directory.
///
/// Production code discovers the platform config directory; tests point an
/// instance at a temporary directory.
#[derive(Debug, Clone)]
pub struct FrigoPaths {
    config_dir: PathBuf,
}

impl FrigoPaths {
    /// Resolves the platform config directory (e.g. `~/.config/frigo/`).
    pub fn discover() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| FrigoError::config("Cannot determine the config directory"))?;
        Ok(Self {
            config_dir: base.join(APP_DIR),
        })
    }

    /// Uses an explicit config directory instead of the platform default.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// Path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the persisted auth session.
    ///
    /// The file carries bearer tokens; it is written with 600 permissions.
    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.json")
    }

    /// Path to the secrets file.
    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    /// Path to the logs directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let paths = FrigoPaths::with_config_dir("/tmp/frigo-test");
        assert!(paths.config_file().starts_with(paths.config_dir()));
        assert!(paths.credentials_file().ends_with("credentials.json"));
        assert!(paths.secret_file().ends_with("secret.json"));
        assert!(paths.logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_discover_appends_app_dir() {
        if let Ok(paths) = FrigoPaths::discover() {
            assert!(paths.config_dir().ends_with(APP_DIR));
        }
    }
}
