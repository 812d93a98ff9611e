//! Asynchronous backend task domain model.
//!
//! Question and MCQ submissions are processed asynchronously by the backend:
//! the submission call returns a task identifier and the client observes the
//! task through status polling until it reaches a terminal state.

use serde::{Deserialize, Serialize};

use crate::chat::McqPrompt;

/// Status reported by the backend for an asynchronous task.
///
/// `Success` and `Failure` are terminal; every other status means the task is
/// still in flight and the client should keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// The task has been accepted but no worker picked it up yet.
    Pending,
    /// A worker is processing the task.
    Started,
    /// The task completed and a result payload is available.
    Success,
    /// The task failed; an error message may be attached.
    Failure,
    /// The backend re-queued the task after a transient failure.
    Retry,
}

impl TaskStatus {
    /// Returns true for `Success` and `Failure`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// Classification of a successful task result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// A regular advisory answer.
    Answer,
    /// Conversational meta content (greetings, clarifications).
    Meta,
    /// The bot posed a multiple-choice question and is waiting for a selection.
    Mcq,
    /// The question was rejected (off-topic, policy).
    Rejection,
    /// Plain text without further classification.
    Text,
}

/// Handle returned by a submission call, used to poll for the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    /// Opaque task identifier assigned by the backend.
    pub task_id: String,
    /// The chat session the task belongs to.
    pub session_id: String,
}

/// The typed result payload of a successfully completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The chat session the reply belongs to.
    pub session_id: Option<String>,
    /// Classification of the reply.
    pub kind: Option<ResponseKind>,
    /// The bot's message text.
    pub message: String,
    /// Follow-up questions suggested by the bot.
    pub suggestions: Vec<String>,
    /// Multiple-choice prompt, present when `kind` is `Mcq`.
    pub mcq: Option<McqPrompt>,
    /// Identifier of the message carrying the MCQ, needed to answer it.
    pub mcq_message_id: Option<String>,
    /// Free-text questions the user may still ask in this session.
    pub remaining_questions: Option<u32>,
}

/// Terminal outcome of a question or MCQ submission as seen by the caller.
///
/// This replaces the loosely-typed `{ success, ... }` result shape: failure
/// carries the user-facing message and whether the session quota was the
/// cause, so the UI can disable input instead of offering a retry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// The task succeeded and produced a reply.
    Success(ChatReply),
    /// The task failed, was rejected synchronously, or timed out.
    Failure {
        /// User-facing error message.
        message: String,
        /// True when the per-session question quota caused the failure.
        session_limit_reached: bool,
    },
}

impl ChatOutcome {
    /// Creates a plain failure outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            session_limit_reached: false,
        }
    }

    /// Creates a failure outcome caused by the session question quota.
    pub fn limit_reached(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            session_limit_reached: true,
        }
    }

    /// Returns true if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
