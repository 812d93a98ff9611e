//! Fixed-interval polling for asynchronous backend tasks.
//!
//! Question and MCQ submissions return a task id; the result is observed by
//! polling the task status endpoint until the task reaches a terminal state,
//! the attempt budget runs out, or the caller cancels.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use frigo_core::chat::McqPrompt;
use frigo_core::config::PollConfig;
use frigo_core::error::{FrigoError, Result};
use frigo_core::task::{ResponseKind, TaskStatus};

/// Task status payload as reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskStatusBody {
    pub task_id: String,
    pub task_status: TaskStatus,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ResponseKind>,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub mcq: Option<McqPrompt>,
    #[serde(default)]
    pub mcq_message_id: Option<String>,
    #[serde(default)]
    pub remaining_daily_questions: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// How a polling run ended, short of an unrecoverable error.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The task reached `SUCCESS` or `FAILURE`; the payload is attached.
    Terminal(TaskStatusBody),
    /// The attempt budget ran out before the task finished.
    TimedOut,
}

/// Supplies the current status of a task. Implemented by the chat endpoint
/// bindings; tests substitute scripted sources.
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusBody>;
}

/// Polls a task to completion with a fixed delay between attempts.
///
/// Requests are strictly sequential: each attempt finishes (or fails) before
/// the delay for the next one starts, so at most one status request is in
/// flight at any time. Transient failures (transport errors, 5xx, 429)
/// consume an attempt and are retried after the same delay; other errors
/// abort the run.
#[derive(Debug, Clone)]
pub struct TaskPoller {
    config: PollConfig,
}

impl TaskPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Polls `task_id` until it is terminal, the budget is exhausted, or
    /// `cancel` fires.
    ///
    /// Cancellation is observed between attempts and during the inter-attempt
    /// delay, and yields `FrigoError::Cancelled`.
    pub async fn poll<S: TaskStatusSource + ?Sized>(
        &self,
        source: &S,
        task_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome> {
        for attempt in 1..=self.config.max_attempts {
            if cancel.is_cancelled() {
                debug!(task_id, attempt, "Polling cancelled");
                return Err(FrigoError::Cancelled);
            }

            match source.task_status(task_id).await {
                Ok(body) if body.task_status.is_terminal() => {
                    debug!(task_id, attempt, status = ?body.task_status, "Task finished");
                    return Ok(PollOutcome::Terminal(body));
                }
                Ok(body) => {
                    debug!(task_id, attempt, status = ?body.task_status, "Task still running");
                }
                Err(err) if err.is_transient() => {
                    warn!(task_id, attempt, error = %err, "Transient polling error, will retry");
                }
                Err(err) => return Err(err),
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(task_id, attempt, "Polling cancelled during delay");
                    return Err(FrigoError::Cancelled);
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        warn!(
            task_id,
            attempts = self.config.max_attempts,
            "Task did not finish within the attempt budget"
        );
        Ok(PollOutcome::TimedOut)
    }
}
