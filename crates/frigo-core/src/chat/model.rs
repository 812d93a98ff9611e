//! Chat session and message entities.

use serde::{Deserialize, Serialize};

use crate::error::{FrigoError, Result};

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Questions may still be asked.
    Active,
    /// The per-session question quota is exhausted.
    LimitReached,
}

/// A chat session as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier.
    pub id: String,
    /// Human-readable session title.
    pub title: String,
    /// Timestamp when the session was started (ISO 8601 format).
    pub started_at: String,
    /// Current session status.
    pub status: SessionStatus,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Backend classification of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// A free-text question from the user.
    Question,
    /// A generic bot response.
    Response,
    /// The user's answer to a multiple-choice question.
    McqResponse,
    /// An advisory answer from the bot.
    BotAnswer,
}

/// A multiple-choice question posed by the bot mid-conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqPrompt {
    /// The question text.
    pub question: String,
    /// The options the user may choose from.
    pub options: Vec<String>,
}

impl McqPrompt {
    /// Returns true if `option` is one of the offered choices.
    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// A single message in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: String,
    /// Position of the message within the session.
    pub sequence_number: u64,
    /// Who authored the message.
    pub sender: Sender,
    /// The message text.
    pub message_text: String,
    /// Backend classification of the message.
    pub message_type: MessageType,
    /// Follow-up questions suggested alongside the message.
    #[serde(default)]
    pub suggested_questions: Option<Vec<String>>,
    /// Multiple-choice prompt attached to the message, if any.
    #[serde(default)]
    pub mcq_options: Option<McqPrompt>,
    /// The option the user selected, once answered.
    #[serde(default)]
    pub mcq_selected_option: Option<String>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub created_at: String,
}

impl ChatMessage {
    /// Returns true if this message carries an MCQ that has not been answered.
    pub fn awaits_mcq_answer(&self) -> bool {
        self.mcq_options.is_some() && self.mcq_selected_option.is_none()
    }

    /// Records the user's selection for this message's MCQ.
    ///
    /// An MCQ transitions from unanswered to answered exactly once: answering
    /// an already-answered MCQ, a message without an MCQ, or choosing an
    /// option outside the offered list is rejected.
    pub fn answer_mcq(&mut self, option: &str) -> Result<()> {
        let prompt = self
            .mcq_options
            .as_ref()
            .ok_or_else(|| FrigoError::validation("Message has no multiple-choice question"))?;

        if self.mcq_selected_option.is_some() {
            return Err(FrigoError::validation(
                "Multiple-choice question was already answered",
            ));
        }

        if !prompt.contains(option) {
            return Err(FrigoError::validation(format!(
                "'{}' is not one of the offered options",
                option
            )));
        }

        self.mcq_selected_option = Some(option.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq_message() -> ChatMessage {
        ChatMessage {
            id: "m1".to_string(),
            sequence_number: 3,
            sender: Sender::Bot,
            message_text: "Which variety do you store?".to_string(),
            message_type: MessageType::Response,
            suggested_questions: None,
            mcq_options: Some(McqPrompt {
                question: "Which variety do you store?".to_string(),
                options: vec!["Kufri Jyoti".to_string(), "Kufri Bahar".to_string()],
            }),
            mcq_selected_option: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_mcq_answered_exactly_once() {
        let mut msg = mcq_message();
        assert!(msg.awaits_mcq_answer());

        msg.answer_mcq("Kufri Jyoti").unwrap();
        assert!(!msg.awaits_mcq_answer());
        assert_eq!(msg.mcq_selected_option.as_deref(), Some("Kufri Jyoti"));

        // A second selection must be rejected and must not change the answer.
        let err = msg.answer_mcq("Kufri Bahar").unwrap_err();
        assert!(matches!(err, FrigoError::Validation(_)));
        assert_eq!(msg.mcq_selected_option.as_deref(), Some("Kufri Jyoti"));
    }

    #[test]
    fn test_mcq_rejects_unknown_option() {
        let mut msg = mcq_message();
        let err = msg.answer_mcq("Atlantic").unwrap_err();
        assert!(matches!(err, FrigoError::Validation(_)));
        assert!(msg.awaits_mcq_answer());
    }

    #[test]
    fn test_answer_without_mcq_rejected() {
        let mut msg = mcq_message();
        msg.mcq_options = None;
        assert!(msg.answer_mcq("Kufri Jyoti").is_err());
    }

    #[test]
    fn test_session_status_wire_format() {
        let status: SessionStatus = serde_json::from_str("\"limit_reached\"").unwrap();
        assert_eq!(status, SessionStatus::LimitReached);
    }
}
