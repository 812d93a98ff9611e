//! Wiring of storages, backend clients and services.

use std::sync::Arc;

use anyhow::Result;

use frigo_api::{ApiClient, RestAuthBackend, RestChatBackend, RestIntakeBackend, TaskPoller};
use frigo_application::{AuthService, ChatService, IntakeService};
use frigo_infrastructure::{
    ConfigStorage, CredentialStorage, FrigoPaths, SecretStorage, StoredTokenProvider,
};

/// Everything a command needs, built once at startup.
pub struct AppContext {
    pub paths: FrigoPaths,
    pub secrets: SecretStorage,
    pub auth: AuthService,
    pub intake: IntakeService,
    chat_backend: Arc<RestChatBackend>,
}

impl AppContext {
    pub fn build() -> Result<Self> {
        let paths = FrigoPaths::discover()?;
        let config = ConfigStorage::new(&paths).load()?;
        let credentials = Arc::new(CredentialStorage::new(&paths));
        let secrets = SecretStorage::new(&paths);

        let tokens = Arc::new(StoredTokenProvider::new(credentials.clone()));
        let api = ApiClient::new(config.api_base_url.clone(), tokens);
        let poller = TaskPoller::new(config.poll_config());

        let auth_backend = Arc::new(RestAuthBackend::new(api.clone()));
        let intake_backend = Arc::new(RestIntakeBackend::new(api.clone()));
        let chat_backend = Arc::new(RestChatBackend::new(api, poller));

        Ok(Self {
            paths,
            auth: AuthService::new(auth_backend, credentials),
            intake: IntakeService::new(intake_backend),
            secrets,
            chat_backend,
        })
    }

    /// A chat service without a session; the first question opens one.
    pub fn new_chat(&self) -> ChatService {
        ChatService::new(self.chat_backend.clone())
    }

    /// A chat service resumed from an existing session.
    pub async fn resume_chat(&self, session_id: &str) -> frigo_core::Result<ChatService> {
        ChatService::resume(self.chat_backend.clone(), session_id).await
    }
}
