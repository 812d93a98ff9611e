//! Application services orchestrating the domain model, storage and backend.

pub mod auth_service;
pub mod chat_service;
pub mod intake_service;

pub use auth_service::AuthService;
pub use chat_service::ChatService;
pub use intake_service::IntakeService;
