//! Authentication domain model and the credential seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned user id.
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Timestamp the account was created (ISO 8601 format), when reported.
    #[serde(default)]
    pub date_joined: Option<String>,
}

/// Bearer token pair issued at signup/login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived access token attached to authenticated calls.
    pub access: String,
    /// Long-lived token used to mint a new access token.
    pub refresh: String,
}

/// Everything the client persists about a logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub tokens: AuthTokens,
}

/// Payload for registering a new account.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Password confirmation, validated server-side.
    pub password2: String,
}

/// Supplies the access token for outbound calls and absorbs auth failures.
///
/// Every authenticated call receives its credentials through this injected
/// seam instead of ambient module state. When the backend answers 401/403
/// the caller notifies the provider, which clears whatever it has stored so
/// the application drops back to the login flow.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// The current access token, if any.
    async fn access_token(&self) -> Option<String>;

    /// Called when the backend rejected the credentials; implementations
    /// clear their stored state.
    async fn handle_unauthorized(&self);
}

/// A fixed-token provider for tests and one-off scripted calls.
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider with no token: requests go out unauthenticated.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Option<String> {
        self.token.clone()
    }

    async fn handle_unauthorized(&self) {}
}
