//! REST bindings for the advisory backend plus the direct Gemini variant.

pub mod auth;
pub mod chat;
pub mod client;
pub mod endpoints;
pub mod gemini;
pub mod intake;
pub mod poller;

pub use auth::RestAuthBackend;
pub use chat::RestChatBackend;
pub use client::ApiClient;
pub use gemini::{GeminiChat, GroundedReply, GroundingSource};
pub use intake::RestIntakeBackend;
pub use poller::{PollOutcome, TaskPoller, TaskStatusBody, TaskStatusSource};
