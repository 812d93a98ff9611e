//! Intake endpoint bindings.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use frigo_core::backend::{IntakeBackend, IntakeReceipt, StoredIntake};
use frigo_core::error::Result;
use frigo_core::intake::IntakeSubmission;

use crate::client::ApiClient;
use crate::endpoints;

#[derive(Debug, Deserialize)]
struct SubmitIntakeEnvelope {
    data: SubmitIntakeData,
}

#[derive(Debug, Deserialize)]
struct SubmitIntakeData {
    session_id: String,
    #[serde(default)]
    suggested_questions: Vec<SuggestedQuestion>,
}

#[derive(Debug, Deserialize)]
struct SuggestedQuestion {
    #[allow(dead_code)]
    id: u64,
    text: String,
}

#[derive(Debug, Deserialize)]
struct SessionIntakeEnvelope {
    data: SessionIntakeData,
}

#[derive(Debug, Deserialize)]
struct SessionIntakeData {
    intake: IntakeDto,
}

#[derive(Debug, Deserialize)]
struct IntakeDto {
    user_choice: String,
    intake_data: serde_json::Value,
    is_active: bool,
}

/// [`IntakeBackend`] implementation against the advisory REST API.
#[derive(Clone)]
pub struct RestIntakeBackend {
    api: ApiClient,
}

impl RestIntakeBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl IntakeBackend for RestIntakeBackend {
    async fn submit_intake(&self, submission: &IntakeSubmission) -> Result<IntakeReceipt> {
        let payload = json!({
            "user_choice": submission.user_choice,
            "intake_data": submission.answers,
        });

        let envelope: SubmitIntakeEnvelope =
            self.api.post(endpoints::SUBMIT_INTAKE, &payload).await?;
        info!(session_id = %envelope.data.session_id, "Intake submitted");

        Ok(IntakeReceipt {
            session_id: envelope.data.session_id,
            suggested_questions: envelope
                .data
                .suggested_questions
                .into_iter()
                .map(|q| q.text)
                .collect(),
        })
    }

    async fn session_intake(&self, session_id: &str) -> Result<StoredIntake> {
        let envelope: SessionIntakeEnvelope =
            self.api.get(&endpoints::session_intake(session_id)).await?;
        let intake = envelope.data.intake;
        Ok(StoredIntake {
            user_choice: intake.user_choice,
            intake_data: intake.intake_data,
            is_active: intake.is_active,
        })
    }
}
