//! Authentication use cases: login, signup, logout, profile and the
//! password-reset flow.

use std::sync::Arc;

use tracing::info;

use frigo_core::auth::{AuthSession, SignupRequest, User};
use frigo_core::backend::{AuthBackend, OtpDispatch};
use frigo_core::error::{FrigoError, Result};
use frigo_infrastructure::CredentialStorage;

/// Orchestrates the auth endpoints and keeps `credentials.json` in sync.
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    storage: Arc<CredentialStorage>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn AuthBackend>, storage: Arc<CredentialStorage>) -> Self {
        Self { backend, storage }
    }

    /// Registers a new account and persists the issued session.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthSession> {
        let session = self.backend.signup(request).await?;
        self.storage.save(&session)?;
        Ok(session)
    }

    /// Logs in and persists the issued session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self.backend.login(email, password).await?;
        self.storage.save(&session)?;
        info!(email, "Session persisted");
        Ok(session)
    }

    /// Drops the stored session.
    pub fn logout(&self) -> Result<()> {
        self.storage.clear()
    }

    /// Returns true when a session is stored locally.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.storage.load(), Ok(Some(_)))
    }

    /// The locally stored user, if logged in.
    pub fn current_user(&self) -> Result<Option<User>> {
        Ok(self.storage.load()?.map(|session| session.user))
    }

    /// Mints a new access token from the stored refresh token and persists it.
    pub async fn refresh(&self) -> Result<()> {
        let session = self
            .storage
            .load()?
            .ok_or_else(|| FrigoError::Unauthorized("Not logged in".to_string()))?;

        let access = self.backend.refresh_token(&session.tokens.refresh).await?;
        self.storage.update_access_token(&access)?;
        Ok(())
    }

    /// Fetches the profile from the backend.
    pub async fn profile(&self) -> Result<User> {
        self.backend.get_profile().await
    }

    /// Updates the name fields and returns the fresh profile.
    pub async fn update_profile(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<User> {
        let user = self.backend.update_profile(first_name, last_name).await?;
        // Keep the stored copy in sync with the backend.
        if let Some(mut session) = self.storage.load()? {
            session.user = user.clone();
            self.storage.save(&session)?;
        }
        Ok(user)
    }

    /// Requests a password-reset OTP.
    pub async fn forgot_password(&self, email: &str) -> Result<OtpDispatch> {
        self.backend.forgot_password(email).await
    }

    /// Verifies a password-reset OTP.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<bool> {
        self.backend.verify_otp(email, otp).await
    }

    /// Completes the password reset after OTP verification.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<bool> {
        self.backend
            .reset_password(email, otp, new_password, confirm_password)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use frigo_core::auth::AuthTokens;
    use frigo_infrastructure::FrigoPaths;
    use tempfile::TempDir;

    struct MockAuthBackend {
        fail_login: bool,
    }

    fn user() -> User {
        User {
            id: 1,
            email: "owner@example.org".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Patel".to_string(),
            date_joined: None,
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            user: user(),
            tokens: AuthTokens {
                access: "access-1".to_string(),
                refresh: "refresh-1".to_string(),
            },
        }
    }

    #[async_trait]
    impl AuthBackend for MockAuthBackend {
        async fn signup(&self, _request: &SignupRequest) -> Result<AuthSession> {
            Ok(session())
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<AuthSession> {
            if self.fail_login {
                Err(FrigoError::api_status(400, "Invalid credentials"))
            } else {
                Ok(session())
            }
        }

        async fn forgot_password(&self, email: &str) -> Result<OtpDispatch> {
            Ok(OtpDispatch {
                email: email.to_string(),
                otp_expires_in_minutes: 10,
            })
        }

        async fn verify_otp(&self, _email: &str, otp: &str) -> Result<bool> {
            Ok(otp == "123456")
        }

        async fn reset_password(
            &self,
            _email: &str,
            _otp: &str,
            new_password: &str,
            confirm_password: &str,
        ) -> Result<bool> {
            Ok(new_password == confirm_password)
        }

        async fn refresh_token(&self, _refresh: &str) -> Result<String> {
            Ok("access-2".to_string())
        }

        async fn get_profile(&self) -> Result<User> {
            Ok(user())
        }

        async fn update_profile(
            &self,
            first_name: Option<&str>,
            _last_name: Option<&str>,
        ) -> Result<User> {
            let mut user = user();
            if let Some(first_name) = first_name {
                user.first_name = first_name.to_string();
            }
            Ok(user)
        }
    }

    fn service(dir: &TempDir, fail_login: bool) -> (AuthService, Arc<CredentialStorage>) {
        let storage = Arc::new(CredentialStorage::new(&FrigoPaths::with_config_dir(
            dir.path(),
        )));
        let service = AuthService::new(Arc::new(MockAuthBackend { fail_login }), storage.clone());
        (service, storage)
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let dir = TempDir::new().unwrap();
        let (service, storage) = service(&dir, false);

        assert!(!service.is_authenticated());
        service.login("owner@example.org", "pw").await.unwrap();

        assert!(service.is_authenticated());
        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.tokens.access, "access-1");
    }

    #[tokio::test]
    async fn test_failed_login_leaves_no_session() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir, true);

        assert!(service.login("owner@example.org", "pw").await.is_err());
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir, false);

        service.login("owner@example.org", "pw").await.unwrap();
        service.logout().unwrap();
        assert!(!service.is_authenticated());
        assert!(service.current_user().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_updates_stored_access_token() {
        let dir = TempDir::new().unwrap();
        let (service, storage) = service(&dir, false);

        service.login("owner@example.org", "pw").await.unwrap();
        service.refresh().await.unwrap();

        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.tokens.access, "access-2");
        assert_eq!(stored.tokens.refresh, "refresh-1");
    }

    #[tokio::test]
    async fn test_refresh_without_session_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir, false);
        assert!(service.refresh().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_update_profile_syncs_stored_user() {
        let dir = TempDir::new().unwrap();
        let (service, storage) = service(&dir, false);

        service.login("owner@example.org", "pw").await.unwrap();
        service.update_profile(Some("Aisha"), None).await.unwrap();

        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.user.first_name, "Aisha");
    }
}
