//! [`TokenProvider`] backed by the credential storage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use frigo_core::auth::TokenProvider;

use crate::storage::credential_storage::CredentialStorage;

/// Supplies the access token from `credentials.json` and clears the file when
/// the backend rejects it, so the next run lands on the login flow.
pub struct StoredTokenProvider {
    storage: Arc<CredentialStorage>,
}

impl StoredTokenProvider {
    pub fn new(storage: Arc<CredentialStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Option<String> {
        match self.storage.load() {
            Ok(session) => session.map(|s| s.tokens.access),
            Err(err) => {
                warn!(error = %err, "Failed to read stored credentials");
                None
            }
        }
    }

    async fn handle_unauthorized(&self) {
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "Failed to clear rejected credentials");
        }
    }
}
