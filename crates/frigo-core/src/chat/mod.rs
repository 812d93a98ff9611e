//! Chat domain model.
//!
//! Sessions and messages are owned by the backend; the client keeps a
//! read-through view of them plus the per-session conversation state
//! (quota, open MCQ, limit flag).

mod conversation;
mod model;

pub use conversation::Conversation;
pub use model::{ChatMessage, ChatSession, McqPrompt, MessageType, Sender, SessionStatus};
