//! Authentication endpoint bindings.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use frigo_core::auth::{AuthSession, AuthTokens, SignupRequest, User};
use frigo_core::backend::{AuthBackend, OtpDispatch};
use frigo_core::error::Result;

use crate::client::ApiClient;
use crate::endpoints;

#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    data: AuthData,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    user: User,
    access: String,
    refresh: String,
}

impl From<AuthData> for AuthSession {
    fn from(data: AuthData) -> Self {
        Self {
            user: data.user,
            tokens: AuthTokens {
                access: data.access,
                refresh: data.refresh,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OtpEnvelope {
    data: OtpData,
}

#[derive(Debug, Deserialize)]
struct OtpData {
    email: String,
    otp_expires_in_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct VerifyOtpEnvelope {
    data: VerifyOtpData,
}

#[derive(Debug, Deserialize)]
struct VerifyOtpData {
    otp_verified: bool,
}

#[derive(Debug, Deserialize)]
struct ResetPasswordEnvelope {
    data: ResetPasswordData,
}

#[derive(Debug, Deserialize)]
struct ResetPasswordData {
    password_reset: bool,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    data: User,
}

/// [`AuthBackend`] implementation against the advisory REST API.
#[derive(Clone)]
pub struct RestAuthBackend {
    api: ApiClient,
}

impl RestAuthBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthBackend for RestAuthBackend {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthSession> {
        let envelope: AuthEnvelope = self.api.post(endpoints::SIGNUP, request).await?;
        info!(email = %envelope.data.user.email, "Account registered");
        Ok(envelope.data.into())
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let payload = json!({ "email": email, "password": password });
        let envelope: AuthEnvelope = self.api.post(endpoints::LOGIN, &payload).await?;
        info!(email = %envelope.data.user.email, "Logged in");
        Ok(envelope.data.into())
    }

    async fn forgot_password(&self, email: &str) -> Result<OtpDispatch> {
        let payload = json!({ "email": email });
        let envelope: OtpEnvelope = self.api.post(endpoints::FORGOT_PASSWORD, &payload).await?;
        Ok(OtpDispatch {
            email: envelope.data.email,
            otp_expires_in_minutes: envelope.data.otp_expires_in_minutes,
        })
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<bool> {
        let payload = json!({ "email": email, "otp": otp });
        let envelope: VerifyOtpEnvelope = self.api.post(endpoints::VERIFY_OTP, &payload).await?;
        Ok(envelope.data.otp_verified)
    }

    async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<bool> {
        let payload = json!({
            "email": email,
            "otp": otp,
            "new_password": new_password,
            "confirm_password": confirm_password,
        });
        let envelope: ResetPasswordEnvelope =
            self.api.post(endpoints::RESET_PASSWORD, &payload).await?;
        Ok(envelope.data.password_reset)
    }

    async fn refresh_token(&self, refresh: &str) -> Result<String> {
        let payload = json!({ "refresh": refresh });
        let response: RefreshResponse = self.api.post(endpoints::REFRESH_TOKEN, &payload).await?;
        Ok(response.access)
    }

    async fn get_profile(&self) -> Result<User> {
        let envelope: ProfileEnvelope = self.api.get(endpoints::USER_PROFILE).await?;
        Ok(envelope.data)
    }

    async fn update_profile(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<User> {
        let mut payload = serde_json::Map::new();
        if let Some(first_name) = first_name {
            payload.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = last_name {
            payload.insert("last_name".to_string(), json!(last_name));
        }
        let envelope: ProfileEnvelope = self.api.post(endpoints::USER_PROFILE, &payload).await?;
        Ok(envelope.data)
    }
}
