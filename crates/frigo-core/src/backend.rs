//! Backend collaborator traits.
//!
//! These traits decouple the application's use cases from the concrete HTTP
//! client (frigo-api), the same way repository traits decouple storage.
//! Tests substitute mock implementations.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::auth::{AuthSession, SignupRequest, User};
use crate::chat::{ChatMessage, ChatSession, SessionStatus};
use crate::error::Result;
use crate::intake::IntakeSubmission;
use crate::task::ChatOutcome;

/// A freshly created chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub session_id: String,
    pub welcome_message: String,
}

/// Result of a successful intake submission.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeReceipt {
    /// The session the intake opened.
    pub session_id: String,
    /// Questions the backend suggests asking first.
    pub suggested_questions: Vec<String>,
}

/// A session's stored intake as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredIntake {
    pub user_choice: String,
    pub intake_data: serde_json::Value,
    pub is_active: bool,
}

/// A session's transcript plus its quota counters.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub session_id: String,
    pub user_questions_count: u32,
    pub remaining_questions: u32,
    pub can_ask_question: bool,
    pub status: SessionStatus,
    pub messages: Vec<ChatMessage>,
}

/// Result of requesting a password-reset OTP.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpDispatch {
    pub email: String,
    pub otp_expires_in_minutes: u32,
}

/// Authentication endpoints.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Registers a new account and returns the issued session.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthSession>;

    /// Logs in with email and password.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Requests a password-reset OTP for the given email.
    async fn forgot_password(&self, email: &str) -> Result<OtpDispatch>;

    /// Verifies a password-reset OTP.
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<bool>;

    /// Resets the password after OTP verification.
    async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<bool>;

    /// Mints a new access token from a refresh token.
    async fn refresh_token(&self, refresh: &str) -> Result<String>;

    /// Fetches the authenticated user's profile.
    async fn get_profile(&self) -> Result<User>;

    /// Updates the authenticated user's name fields.
    async fn update_profile(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<User>;
}

/// Intake endpoints.
#[async_trait]
pub trait IntakeBackend: Send + Sync {
    /// Submits a completed intake atomically.
    async fn submit_intake(&self, submission: &IntakeSubmission) -> Result<IntakeReceipt>;

    /// Fetches the intake stored for a session.
    async fn session_intake(&self, session_id: &str) -> Result<StoredIntake>;
}

/// Chat endpoints, including the task-polled submissions.
///
/// `ask_question` and `answer_mcq` submit a backend task and poll it to a
/// terminal state; the cancellation token stops polling early when the caller
/// loses interest.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Creates a fresh session without an intake.
    async fn create_session(&self) -> Result<NewSession>;

    /// Submits a free-text question and polls for the reply.
    async fn ask_question(
        &self,
        question: &str,
        session_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome>;

    /// Submits an MCQ selection and polls for the follow-up.
    async fn answer_mcq(
        &self,
        mcq_message_id: &str,
        selected_value: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome>;

    /// Lists the user's sessions.
    async fn list_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Fetches a session's transcript and quota counters.
    async fn chat_history(&self, session_id: &str) -> Result<HistorySnapshot>;

    /// Renames a session.
    async fn update_session_title(&self, session_id: &str, title: &str) -> Result<()>;
}
