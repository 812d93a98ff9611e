//! Client-side conversation state for a single chat session.

use uuid::Uuid;

use super::model::{ChatMessage, MessageType, Sender};
use crate::error::{FrigoError, Result};
use crate::task::{ChatOutcome, ChatReply, ResponseKind};

/// The conversation view the client keeps for one session.
///
/// The backend owns all messages; this aggregate mirrors them and tracks the
/// transient state the UI needs: the remaining question quota, whether the
/// session limit was reached, and which MCQ (if any) is waiting for an
/// answer. While an MCQ is open, free-text input is disabled.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// The session this conversation belongs to, once known.
    pub session_id: Option<String>,
    /// Messages in sequence order.
    pub messages: Vec<ChatMessage>,
    /// Free-text questions the user may still ask, when known.
    pub remaining_questions: Option<u32>,
    /// True once the backend rejected a question for quota reasons.
    pub limit_reached: bool,
    /// Message id of the MCQ currently awaiting an answer.
    pub pending_mcq: Option<String>,
}

impl Conversation {
    /// Creates an empty conversation without a session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the conversation from backend history.
    ///
    /// If the last message carries an unanswered MCQ, input stays locked on
    /// that MCQ, matching the state the user left the session in.
    pub fn from_history(
        session_id: String,
        messages: Vec<ChatMessage>,
        remaining_questions: u32,
        limit_reached: bool,
    ) -> Self {
        let pending_mcq = messages
            .last()
            .filter(|m| m.awaits_mcq_answer())
            .map(|m| m.id.clone());

        Self {
            session_id: Some(session_id),
            messages,
            remaining_questions: Some(remaining_questions),
            limit_reached,
            pending_mcq,
        }
    }

    /// Returns true if the user may submit a free-text question.
    pub fn can_ask(&self) -> bool {
        !self.limit_reached && self.pending_mcq.is_none()
    }

    /// Appends the user's question to the transcript.
    pub fn push_user_question(&mut self, question: &str) {
        let sequence_number = self.next_sequence();
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            sequence_number,
            sender: Sender::User,
            message_text: question.to_string(),
            message_type: MessageType::Question,
            suggested_questions: None,
            mcq_options: None,
            mcq_selected_option: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
    }

    /// Applies a terminal submission outcome to the conversation.
    ///
    /// Success appends the bot's reply (opening an MCQ when one is attached)
    /// and updates the quota; failure appends the error text as a bot message
    /// and latches the limit flag when the quota was the cause.
    pub fn apply_outcome(&mut self, outcome: &ChatOutcome) {
        match outcome {
            ChatOutcome::Success(reply) => self.apply_reply(reply),
            ChatOutcome::Failure {
                message,
                session_limit_reached,
            } => {
                if *session_limit_reached {
                    self.limit_reached = true;
                }
                self.push_bot_text(message, MessageType::Response);
            }
        }
    }

    /// Records the user's selection for the pending MCQ.
    ///
    /// Validates against the MCQ message (answered exactly once, option must
    /// be offered) and returns the MCQ message id to submit to the backend.
    pub fn select_mcq_option(&mut self, option: &str) -> Result<String> {
        let mcq_id = self
            .pending_mcq
            .clone()
            .ok_or_else(|| FrigoError::validation("No multiple-choice question is pending"))?;

        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == mcq_id)
            .ok_or_else(|| FrigoError::not_found("message", mcq_id.clone()))?;

        message.answer_mcq(option)?;
        self.pending_mcq = None;
        Ok(mcq_id)
    }

    fn apply_reply(&mut self, reply: &ChatReply) {
        if self.session_id.is_none() {
            self.session_id = reply.session_id.clone();
        }

        let id = reply
            .mcq_message_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let sequence_number = self.next_sequence();

        self.messages.push(ChatMessage {
            id,
            sequence_number,
            sender: Sender::Bot,
            message_text: reply.message.clone(),
            message_type: MessageType::BotAnswer,
            suggested_questions: if reply.suggestions.is_empty() {
                None
            } else {
                Some(reply.suggestions.clone())
            },
            mcq_options: reply.mcq.clone(),
            mcq_selected_option: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        });

        if reply.kind == Some(ResponseKind::Mcq) {
            self.pending_mcq = reply.mcq_message_id.clone();
        }

        if let Some(remaining) = reply.remaining_questions {
            self.remaining_questions = Some(remaining);
            if remaining == 0 {
                self.limit_reached = true;
            }
        }
    }

    fn push_bot_text(&mut self, text: &str, message_type: MessageType) {
        let sequence_number = self.next_sequence();
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            sequence_number,
            sender: Sender::Bot,
            message_text: text.to_string(),
            message_type,
            suggested_questions: None,
            mcq_options: None,
            mcq_selected_option: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
    }

    fn next_sequence(&self) -> u64 {
        self.messages
            .last()
            .map(|m| m.sequence_number + 1)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::McqPrompt;

    fn mcq_reply() -> ChatReply {
        ChatReply {
            session_id: Some("s1".to_string()),
            kind: Some(ResponseKind::Mcq),
            message: "Which storage goal matters most?".to_string(),
            suggestions: vec![],
            mcq: Some(McqPrompt {
                question: "Which storage goal matters most?".to_string(),
                options: vec!["Long-term".to_string(), "Seed".to_string()],
            }),
            mcq_message_id: Some("mcq-1".to_string()),
            remaining_questions: Some(3),
        }
    }

    #[test]
    fn test_mcq_locks_input_until_answered() {
        let mut conv = Conversation::new();
        conv.push_user_question("How should I store seed potatoes?");
        conv.apply_outcome(&ChatOutcome::Success(mcq_reply()));

        assert!(!conv.can_ask());
        assert_eq!(conv.pending_mcq.as_deref(), Some("mcq-1"));

        let mcq_id = conv.select_mcq_option("Seed").unwrap();
        assert_eq!(mcq_id, "mcq-1");
        assert!(conv.can_ask());

        // The answered MCQ never becomes selectable again.
        assert!(conv.select_mcq_option("Long-term").is_err());
        let msg = conv.messages.iter().find(|m| m.id == "mcq-1").unwrap();
        assert_eq!(msg.mcq_selected_option.as_deref(), Some("Seed"));
    }

    #[test]
    fn test_quota_exhaustion_latches_limit() {
        let mut conv = Conversation::new();
        let mut reply = mcq_reply();
        reply.kind = Some(ResponseKind::Answer);
        reply.mcq = None;
        reply.mcq_message_id = None;
        reply.remaining_questions = Some(0);

        conv.apply_outcome(&ChatOutcome::Success(reply));
        assert!(conv.limit_reached);
        assert!(!conv.can_ask());
    }

    #[test]
    fn test_failure_appends_error_message() {
        let mut conv = Conversation::new();
        conv.apply_outcome(&ChatOutcome::limit_reached(
            "You have reached the maximum number of questions.",
        ));

        assert!(conv.limit_reached);
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].sender, Sender::Bot);
    }

    #[test]
    fn test_sequence_numbers_monotonic() {
        let mut conv = Conversation::new();
        conv.push_user_question("first");
        conv.push_user_question("second");
        assert_eq!(conv.messages[0].sequence_number, 1);
        assert_eq!(conv.messages[1].sequence_number, 2);
    }

    #[test]
    fn test_from_history_restores_pending_mcq() {
        let mut conv = Conversation::new();
        conv.apply_outcome(&ChatOutcome::Success(mcq_reply()));
        let messages = conv.messages.clone();

        let restored = Conversation::from_history("s1".to_string(), messages, 3, false);
        assert_eq!(restored.pending_mcq.as_deref(), Some("mcq-1"));
        assert!(!restored.can_ask());
    }
}
