//! Intake use cases: running the wizard and submitting the result.

use std::sync::Arc;

use tracing::info;

use frigo_core::backend::{IntakeBackend, IntakeReceipt, StoredIntake};
use frigo_core::error::Result;
use frigo_core::intake::{IntakeSubmission, IntakeWizard, UserChoice};

/// Orchestrates the intake questionnaire and its submission.
pub struct IntakeService {
    backend: Arc<dyn IntakeBackend>,
}

impl IntakeService {
    pub fn new(backend: Arc<dyn IntakeBackend>) -> Self {
        Self { backend }
    }

    /// Starts a wizard for the chosen advisory path.
    pub fn start_wizard(&self, user_choice: UserChoice) -> IntakeWizard {
        IntakeWizard::new(user_choice)
    }

    /// Submits a completed intake atomically.
    ///
    /// On failure the caller still holds the wizard (parked on its final
    /// step), so the submission can be retried without re-entering answers.
    pub async fn submit(&self, submission: &IntakeSubmission) -> Result<IntakeReceipt> {
        let receipt = self.backend.submit_intake(submission).await?;
        info!(session_id = %receipt.session_id, "Intake accepted");
        Ok(receipt)
    }

    /// Fetches the intake stored for a session.
    pub async fn session_intake(&self, session_id: &str) -> Result<StoredIntake> {
        self.backend.session_intake(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use frigo_core::error::FrigoError;
    use frigo_core::intake::{AnswerValue, StepAdvance};

    #[derive(Default)]
    struct MockIntakeBackend {
        fail_next: Mutex<bool>,
        submissions: Mutex<Vec<IntakeSubmission>>,
    }

    #[async_trait]
    impl IntakeBackend for MockIntakeBackend {
        async fn submit_intake(&self, submission: &IntakeSubmission) -> Result<IntakeReceipt> {
            if *self.fail_next.lock().unwrap() {
                *self.fail_next.lock().unwrap() = false;
                return Err(FrigoError::api_status(503, "unavailable"));
            }
            self.submissions.lock().unwrap().push(submission.clone());
            Ok(IntakeReceipt {
                session_id: "s1".to_string(),
                suggested_questions: vec!["How do I reduce sprouting?".to_string()],
            })
        }

        async fn session_intake(&self, _session_id: &str) -> Result<StoredIntake> {
            Ok(StoredIntake {
                user_choice: "existing".to_string(),
                intake_data: serde_json::json!({ "location": "Agra" }),
                is_active: true,
            })
        }
    }

    /// Drives a builder wizard to completion.
    fn completed_submission(service: &IntakeService) -> (IntakeWizard, IntakeSubmission) {
        let mut wizard = service.start_wizard(UserChoice::Build);
        loop {
            let answer = if wizard.current_options().is_empty() {
                AnswerValue::Text("x".to_string())
            } else {
                AnswerValue::Choice(wizard.current_options()[0].clone())
            };
            wizard.set_answer(answer).unwrap();
            match wizard.next() {
                StepAdvance::Moved => continue,
                StepAdvance::Completed(submission) => return (wizard, submission),
                StepAdvance::Invalid => panic!("wizard rejected a scripted answer"),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_returns_receipt() {
        let backend = Arc::new(MockIntakeBackend::default());
        let service = IntakeService::new(backend.clone());
        let (_, submission) = completed_submission(&service);

        let receipt = service.submit(&submission).await.unwrap();
        assert_eq!(receipt.session_id, "s1");
        assert_eq!(receipt.suggested_questions.len(), 1);
        assert_eq!(backend.submissions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_can_be_retried_unchanged() {
        let backend = Arc::new(MockIntakeBackend::default());
        *backend.fail_next.lock().unwrap() = true;
        let service = IntakeService::new(backend.clone());
        let (mut wizard, submission) = completed_submission(&service);

        assert!(service.submit(&submission).await.is_err());

        // The wizard is still parked on its final step; confirming again
        // yields an identical submission.
        let StepAdvance::Completed(retry) = wizard.next() else {
            panic!("wizard should still be on the final step");
        };
        assert_eq!(retry, submission);
        service.submit(&retry).await.unwrap();
        assert_eq!(backend.submissions.lock().unwrap().len(), 1);
    }
}
