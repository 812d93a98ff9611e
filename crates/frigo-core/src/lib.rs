pub mod auth;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod intake;
pub mod task;

// Re-export common error type
pub use error::{FrigoError, Result};
