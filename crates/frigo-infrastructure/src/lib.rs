//! File-based storage for configuration, credentials and secrets.

pub mod paths;
pub mod storage;
pub mod token_provider;

pub use crate::paths::FrigoPaths;
pub use crate::storage::{ConfigStorage, CredentialStorage, SecretStorage};
pub use crate::token_provider::StoredTokenProvider;
