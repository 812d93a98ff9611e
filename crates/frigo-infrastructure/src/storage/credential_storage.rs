//! Persistence for the logged-in user's auth session.

use frigo_core::auth::AuthSession;
use frigo_core::error::Result;

use crate::paths::FrigoPaths;
use crate::storage::atomic_file::AtomicJsonFile;

/// Stores the auth session (tokens + profile) in `credentials.json`.
///
/// The file carries bearer tokens, so it is written with 600 permissions.
pub struct CredentialStorage {
    file: AtomicJsonFile<AuthSession>,
}

impl CredentialStorage {
    pub fn new(paths: &FrigoPaths) -> Self {
        Self {
            file: AtomicJsonFile::new(paths.credentials_file()).with_mode(0o600),
        }
    }

    /// Loads the stored session, if one exists.
    pub fn load(&self) -> Result<Option<AuthSession>> {
        self.file.load()
    }

    /// Persists the session after signup or login.
    pub fn save(&self, session: &AuthSession) -> Result<()> {
        self.file.save(session)
    }

    /// Replaces the stored access token after a refresh.
    pub fn update_access_token(&self, access: &str) -> Result<()> {
        if let Some(mut session) = self.load()? {
            session.tokens.access = access.to_string();
            self.file.save(&session)?;
        }
        Ok(())
    }

    /// Removes the stored session. Called on logout and when the backend
    /// rejects the credentials.
    pub fn clear(&self) -> Result<()> {
        self.file.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frigo_core::auth::{AuthTokens, User};
    use tempfile::TempDir;

    fn session() -> AuthSession {
        AuthSession {
            user: User {
                id: 7,
                email: "owner@example.org".to_string(),
                first_name: "Asha".to_string(),
                last_name: "Patel".to_string(),
                date_joined: None,
            },
            tokens: AuthTokens {
                access: "access-1".to_string(),
                refresh: "refresh-1".to_string(),
            },
        }
    }

    fn storage(dir: &TempDir) -> CredentialStorage {
        CredentialStorage::new(&FrigoPaths::with_config_dir(dir.path()))
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        assert!(storage.load().unwrap().is_none());

        storage.save(&session()).unwrap();
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.user.email, "owner@example.org");

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_update_access_token() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.save(&session()).unwrap();
        storage.update_access_token("access-2").unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.tokens.access, "access-2");
        assert_eq!(loaded.tokens.refresh, "refresh-1");
    }

    #[test]
    fn test_update_access_token_without_session_is_noop() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.update_access_token("access-2").unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_credentials_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        storage.save(&session()).unwrap();

        let path = FrigoPaths::with_config_dir(dir.path()).credentials_file();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
