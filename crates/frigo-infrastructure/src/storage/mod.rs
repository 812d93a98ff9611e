pub mod atomic_file;
pub mod config_storage;
pub mod credential_storage;
pub mod secret_storage;

pub use atomic_file::{AtomicFile, AtomicJsonFile, AtomicTomlFile};
pub use config_storage::ConfigStorage;
pub use credential_storage::CredentialStorage;
pub use secret_storage::SecretStorage;
