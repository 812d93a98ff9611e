//! Chat use cases: asking questions, answering MCQs and browsing sessions.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use frigo_core::backend::{ChatBackend, NewSession};
use frigo_core::chat::{ChatSession, Conversation};
use frigo_core::error::{FrigoError, Result};
use frigo_core::task::ChatOutcome;

/// Drives one conversation against the chat backend.
///
/// The service owns the [`Conversation`] aggregate and keeps it consistent
/// with every submission outcome: client-side rules (pending MCQ, question
/// quota) are enforced before any network call.
pub struct ChatService {
    backend: Arc<dyn ChatBackend>,
    conversation: Conversation,
}

impl ChatService {
    /// Starts a service without a session; the first question opens one.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
        }
    }

    /// Attaches the service to an existing session, restoring its transcript.
    pub async fn resume(backend: Arc<dyn ChatBackend>, session_id: &str) -> Result<Self> {
        let snapshot = backend.chat_history(session_id).await?;
        let limit_reached = !snapshot.can_ask_question || snapshot.remaining_questions == 0;
        let conversation = Conversation::from_history(
            snapshot.session_id,
            snapshot.messages,
            snapshot.remaining_questions,
            limit_reached,
        );
        info!(session_id, messages = conversation.messages.len(), "Session resumed");
        Ok(Self {
            backend,
            conversation,
        })
    }

    /// Binds the service to a session created by an intake submission.
    pub fn attach_session(&mut self, session_id: &str) {
        self.conversation.session_id = Some(session_id.to_string());
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Submits a free-text question and applies the outcome.
    ///
    /// Rejected locally when an MCQ is pending or the quota is exhausted.
    pub async fn ask(&mut self, question: &str, cancel: &CancellationToken) -> Result<ChatOutcome> {
        if self.conversation.pending_mcq.is_some() {
            return Err(FrigoError::validation(
                "Answer the pending multiple-choice question first",
            ));
        }
        if self.conversation.limit_reached {
            return Err(FrigoError::validation(
                "The question limit for this session has been reached",
            ));
        }

        self.conversation.push_user_question(question);
        let outcome = self
            .backend
            .ask_question(question, self.conversation.session_id.as_deref(), cancel)
            .await?;
        self.conversation.apply_outcome(&outcome);
        Ok(outcome)
    }

    /// Answers the pending MCQ and applies the follow-up outcome.
    pub async fn answer_mcq(
        &mut self,
        option: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome> {
        let mcq_id = self.conversation.select_mcq_option(option)?;
        let outcome = self.backend.answer_mcq(&mcq_id, option, cancel).await?;
        self.conversation.apply_outcome(&outcome);
        Ok(outcome)
    }

    /// Creates a fresh session without an intake.
    pub async fn create_session(&mut self) -> Result<NewSession> {
        let new_session = self.backend.create_session().await?;
        self.conversation = Conversation::new();
        self.conversation.session_id = Some(new_session.session_id.clone());
        Ok(new_session)
    }

    /// Lists the user's sessions.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        self.backend.list_sessions().await
    }

    /// Renames a session.
    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        self.backend.update_session_title(session_id, title).await
    }
}
