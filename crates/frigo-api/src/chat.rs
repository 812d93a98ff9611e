//! Chat endpoint bindings, including the task-polled submissions.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::info;

use frigo_core::backend::{ChatBackend, HistorySnapshot, NewSession};
use frigo_core::chat::{ChatMessage, ChatSession, SessionStatus};
use frigo_core::error::{FrigoError, Result};
use frigo_core::task::{ChatOutcome, ChatReply, TaskHandle, TaskStatus};

use crate::client::ApiClient;
use crate::endpoints;
use crate::poller::{PollOutcome, TaskPoller, TaskStatusBody, TaskStatusSource};

/// User-facing message when a task fails without an attached error.
const FALLBACK_ERROR: &str = "Something went wrong. Please try again later.";

/// User-facing message when polling exhausts its attempt budget.
const TIMEOUT_ERROR: &str = "Request timed out. Please try again later.";

/// Substring the backend puts in quota rejection messages.
const QUOTA_MARKER: &str = "maximum";

/// User-facing message when a submission response carries no task handle.
const INVALID_RESPONSE: &str = "Invalid response from server.";

#[derive(Debug, Deserialize)]
struct TaskSubmitResponse {
    #[serde(default)]
    message: Option<String>,
    /// `false` when the backend rejected the submission synchronously
    /// because the session quota is exhausted.
    #[serde(default, rename = "async")]
    is_async: Option<bool>,
    #[serde(default)]
    data: Option<TaskHandle>,
}

#[derive(Debug, Deserialize)]
struct TaskStatusEnvelope {
    data: TaskStatusBody,
}

#[derive(Debug, Deserialize)]
struct CreateSessionEnvelope {
    data: CreateSessionData,
}

#[derive(Debug, Deserialize)]
struct CreateSessionData {
    session_id: String,
    welcome_message: String,
}

#[derive(Debug, Deserialize)]
struct ListSessionsEnvelope {
    data: ListSessionsData,
}

#[derive(Debug, Deserialize)]
struct ListSessionsData {
    sessions: Vec<ChatSession>,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    data: HistoryData,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    session: HistorySessionData,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct HistorySessionData {
    id: String,
    user_questions_count: u32,
    remaining_questions: u32,
    can_ask_question: bool,
    status: SessionStatus,
}

#[derive(Debug, Deserialize)]
struct UpdateTitleEnvelope {
    #[serde(default)]
    #[allow(dead_code)]
    message: Option<String>,
}

/// [`ChatBackend`] implementation against the advisory REST API.
#[derive(Clone)]
pub struct RestChatBackend {
    api: ApiClient,
    poller: TaskPoller,
}

impl RestChatBackend {
    pub fn new(api: ApiClient, poller: TaskPoller) -> Self {
        Self { api, poller }
    }
}

/// Accepts a task submission and returns the backend's acknowledgement.
/// Implemented by [`ApiClient`]; tests substitute scripted transports so the
/// submit-then-poll pipeline can be exercised without a server.
#[async_trait]
trait TaskSubmitSource: Send + Sync {
    async fn submit_task(&self, path: &str, payload: &Value) -> Result<TaskSubmitResponse>;
}

#[async_trait]
impl TaskSubmitSource for ApiClient {
    async fn submit_task(&self, path: &str, payload: &Value) -> Result<TaskSubmitResponse> {
        self.post(path, payload).await
    }
}

#[async_trait]
impl TaskStatusSource for ApiClient {
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusBody> {
        let envelope: TaskStatusEnvelope = self.get(&endpoints::task_status(task_id)).await?;
        Ok(envelope.data)
    }
}

/// Submits a free-text question and polls the resulting task.
///
/// Quota rejections never reach the polling stage: a 4xx whose message names
/// the per-session maximum, or a synchronous `async: false` acknowledgement,
/// both return [`ChatOutcome::limit_reached`] directly.
async fn submit_question<S>(
    source: &S,
    poller: &TaskPoller,
    question: &str,
    session_id: Option<&str>,
    cancel: &CancellationToken,
) -> Result<ChatOutcome>
where
    S: TaskSubmitSource + TaskStatusSource,
{
    let mut payload = json!({ "question": question });
    if let Some(id) = session_id {
        payload["session_id"] = json!(id);
    }

    let response = match source.submit_task(endpoints::ASK_QUESTION, &payload).await {
        Ok(response) => response,
        // Quota rejections arrive as a 4xx whose message names the
        // per-session maximum; surface them as a typed outcome so the
        // caller can disable input instead of offering a retry.
        Err(FrigoError::Api { message, .. }) if message.contains(QUOTA_MARKER) => {
            return Ok(ChatOutcome::limit_reached(message));
        }
        Err(err) => return Err(err),
    };

    if response.is_async == Some(false) {
        let message = response
            .message
            .unwrap_or_else(|| FALLBACK_ERROR.to_string());
        return Ok(ChatOutcome::limit_reached(message));
    }

    let Some(handle) = response.data else {
        return Ok(ChatOutcome::failure(INVALID_RESPONSE));
    };

    info!(task_id = %handle.task_id, session_id = %handle.session_id, "Question submitted");
    resolve_task(source, poller, &handle, cancel).await
}

/// Submits an MCQ selection and polls the resulting task.
async fn submit_mcq_answer<S>(
    source: &S,
    poller: &TaskPoller,
    mcq_message_id: &str,
    selected_value: &str,
    cancel: &CancellationToken,
) -> Result<ChatOutcome>
where
    S: TaskSubmitSource + TaskStatusSource,
{
    let payload = json!({
        "mcq_message_id": mcq_message_id,
        "selected_value": selected_value,
    });

    let response = source.submit_task(endpoints::ANSWER_MCQ, &payload).await?;

    let Some(handle) = response.data else {
        return Ok(ChatOutcome::failure(INVALID_RESPONSE));
    };

    info!(task_id = %handle.task_id, "MCQ answer submitted");
    resolve_task(source, poller, &handle, cancel).await
}

/// Polls the submitted task and converts its terminal payload into a
/// [`ChatOutcome`].
async fn resolve_task<S: TaskStatusSource + ?Sized>(
    source: &S,
    poller: &TaskPoller,
    handle: &TaskHandle,
    cancel: &CancellationToken,
) -> Result<ChatOutcome> {
    match poller.poll(source, &handle.task_id, cancel).await? {
        PollOutcome::Terminal(body) if body.task_status == TaskStatus::Success => {
            Ok(ChatOutcome::Success(ChatReply {
                session_id: body.session_id,
                kind: body.kind,
                message: body.response_message.unwrap_or_default(),
                suggestions: body.suggestions.unwrap_or_default(),
                mcq: body.mcq,
                mcq_message_id: body.mcq_message_id,
                remaining_questions: body.remaining_daily_questions,
            }))
        }
        PollOutcome::Terminal(body) => Ok(ChatOutcome::failure(
            body.error.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        )),
        PollOutcome::TimedOut => Ok(ChatOutcome::failure(TIMEOUT_ERROR)),
    }
}

#[async_trait]
impl ChatBackend for RestChatBackend {
    async fn create_session(&self) -> Result<NewSession> {
        let envelope: CreateSessionEnvelope =
            self.api.post(endpoints::LIST_SESSIONS, &json!({})).await?;
        Ok(NewSession {
            session_id: envelope.data.session_id,
            welcome_message: envelope.data.welcome_message,
        })
    }

    async fn ask_question(
        &self,
        question: &str,
        session_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome> {
        submit_question(&self.api, &self.poller, question, session_id, cancel).await
    }

    async fn answer_mcq(
        &self,
        mcq_message_id: &str,
        selected_value: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatOutcome> {
        submit_mcq_answer(&self.api, &self.poller, mcq_message_id, selected_value, cancel).await
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let envelope: ListSessionsEnvelope = self.api.get(endpoints::LIST_SESSIONS).await?;
        Ok(envelope.data.sessions)
    }

    async fn chat_history(&self, session_id: &str) -> Result<HistorySnapshot> {
        let envelope: HistoryEnvelope = self.api.get(&endpoints::chat_history(session_id)).await?;
        let session = envelope.data.session;
        Ok(HistorySnapshot {
            session_id: session.id,
            user_questions_count: session.user_questions_count,
            remaining_questions: session.remaining_questions,
            can_ask_question: session.can_ask_question,
            status: session.status,
            messages: envelope.data.messages,
        })
    }

    async fn update_session_title(&self, session_id: &str, title: &str) -> Result<()> {
        let _: UpdateTitleEnvelope = self
            .api
            .patch(&endpoints::session_title(session_id), &json!({ "title": title }))
            .await?;
        Ok(())
    }
}
