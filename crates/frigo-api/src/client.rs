//! HTTP client shared by all backend endpoint bindings.
//!
//! Every request goes through [`ApiClient`], which attaches the bearer token
//! from the injected [`TokenProvider`], maps transport failures and non-2xx
//! responses to typed errors, and notifies the provider when the backend
//! rejects the credentials.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use frigo_core::auth::TokenProvider;
use frigo_core::error::{FrigoError, Result};

/// Typed client for the advisory backend's REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// A trailing slash on `base_url` is tolerated; endpoint paths always
    /// start with `/`.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
            tokens,
        }
    }

    /// Sends a GET request and deserializes the response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path));
        self.execute(path, request).await
    }

    /// Sends a POST request with a JSON body and deserializes the response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(path, request).await
    }

    /// Sends a PATCH request with a JSON body and deserializes the response.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.patch(self.url(path)).json(body);
        self.execute(path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let request = match self.tokens.access_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            warn!(path, error = %err, "Request failed to reach the backend");
            FrigoError::Transport(err.to_string())
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "Backend response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = read_error_message(response).await;
            // Stored credentials are stale; drop them so the next action
            // lands on the login flow instead of looping on 401s.
            self.tokens.handle_unauthorized().await;
            return Err(FrigoError::Unauthorized(message));
        }

        if !status.is_success() {
            let message = read_error_message(response).await;
            return Err(FrigoError::api_status(status.as_u16(), message));
        }

        let body = response
            .text()
            .await
            .map_err(|err| FrigoError::Transport(err.to_string()))?;
        serde_json::from_str(&body).map_err(FrigoError::from)
    }
}

/// Pulls the `message` field out of an error body, falling back to the raw
/// text when the body is not the usual envelope.
async fn read_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body
            }
        })
}
