//! The intake wizard state machine.

use std::collections::BTreeMap;

use serde::Serialize;

use super::field::{AnswerValue, FormField, UserChoice};
use super::flow::{builder_flow, owner_flow, varieties_for, CATEGORY_FIELD_KEY, VARIETY_FIELD_KEY};
use crate::error::{FrigoError, Result};

/// Result of trying to advance to the next step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAdvance {
    /// The current answer is missing or invalid; the step index is unchanged.
    Invalid,
    /// Moved to the next step.
    Moved,
    /// The final step was confirmed; the submission is ready to send.
    /// The wizard stays on the final step so a failed submission can be
    /// retried without re-entering data.
    Completed(IntakeSubmission),
}

/// Result of moving backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBack {
    /// Moved to the previous step; answers are kept.
    Moved,
    /// Back from the first step: leave the wizard for role selection.
    Exited,
}

/// The full answer set submitted atomically at the end of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeSubmission {
    /// Which advisory path produced the answers.
    pub user_choice: UserChoice,
    /// Answer per field key.
    pub answers: BTreeMap<String, AnswerValue>,
}

/// Walks an ordered list of typed fields, collecting one validated answer per
/// step.
///
/// Invariants:
/// - `next()` never advances past a missing or invalid answer.
/// - `back()` never discards answers for other steps.
/// - A dependent field (variety) whose answer becomes invalid after its
///   driving field (category) changes is cleared at that moment, so no stale
///   value can reach the submission.
#[derive(Debug, Clone)]
pub struct IntakeWizard {
    user_choice: UserChoice,
    fields: Vec<FormField>,
    step_index: usize,
    answers: BTreeMap<String, AnswerValue>,
}

impl IntakeWizard {
    /// Creates a wizard for the chosen advisory path.
    pub fn new(user_choice: UserChoice) -> Self {
        let fields = match user_choice {
            UserChoice::Existing => owner_flow(),
            UserChoice::Build => builder_flow(),
        };
        Self {
            user_choice,
            fields,
            step_index: 0,
            answers: BTreeMap::new(),
        }
    }

    /// The advisory path this wizard collects answers for.
    pub fn user_choice(&self) -> UserChoice {
        self.user_choice
    }

    /// Zero-based index of the current step.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Total number of steps.
    pub fn step_count(&self) -> usize {
        self.fields.len()
    }

    /// The field being asked at the current step.
    pub fn current_field(&self) -> &FormField {
        &self.fields[self.step_index]
    }

    /// The active option set for the current step.
    ///
    /// For the variety field this derives from the chosen category; for every
    /// other field it is the static option list.
    pub fn current_options(&self) -> Vec<String> {
        self.options_for(self.current_field())
    }

    /// Returns the stored answer for a field key, if any.
    pub fn answer(&self, key: &str) -> Option<&AnswerValue> {
        self.answers.get(key)
    }

    /// Stores an answer for the current step.
    ///
    /// The value must match the field's input kind, and selected options must
    /// belong to the active option set. Changing the category clears a stored
    /// variety that is no longer offered.
    pub fn set_answer(&mut self, value: AnswerValue) -> Result<()> {
        let field = self.current_field().clone();

        if !value.is_valid_for(field.kind) {
            return Err(FrigoError::validation(format!(
                "Answer does not fit field '{}'",
                field.key
            )));
        }

        let options = self.options_for(&field);
        match &value {
            AnswerValue::Choice(choice) => {
                if !options.iter().any(|o| o == choice) {
                    return Err(FrigoError::validation(format!(
                        "'{}' is not an offered option for '{}'",
                        choice, field.key
                    )));
                }
            }
            AnswerValue::MultiChoice(choices) => {
                if let Some(bad) = choices.iter().find(|c| !options.iter().any(|o| &o == c)) {
                    return Err(FrigoError::validation(format!(
                        "'{}' is not an offered option for '{}'",
                        bad, field.key
                    )));
                }
            }
            AnswerValue::Text(_) => {}
        }

        self.answers.insert(field.key.to_string(), value);

        if field.key == CATEGORY_FIELD_KEY {
            self.invalidate_stale_variety();
        }

        Ok(())
    }

    /// Advances to the next step, or reports the submission on the final one.
    ///
    /// A missing or invalid answer for the current step is a no-op.
    pub fn next(&mut self) -> StepAdvance {
        if !self.current_answer_valid() {
            return StepAdvance::Invalid;
        }

        if self.step_index + 1 < self.fields.len() {
            self.step_index += 1;
            StepAdvance::Moved
        } else {
            StepAdvance::Completed(IntakeSubmission {
                user_choice: self.user_choice,
                answers: self.answers.clone(),
            })
        }
    }

    /// Moves to the previous step, keeping all stored answers.
    pub fn back(&mut self) -> StepBack {
        if self.step_index > 0 {
            self.step_index -= 1;
            StepBack::Moved
        } else {
            StepBack::Exited
        }
    }

    fn options_for(&self, field: &FormField) -> Vec<String> {
        if field.key == VARIETY_FIELD_KEY {
            let category = match self.answers.get(CATEGORY_FIELD_KEY) {
                Some(AnswerValue::Choice(c)) => c.as_str(),
                _ => return Vec::new(),
            };
            varieties_for(category)
                .iter()
                .map(|v| v.to_string())
                .collect()
        } else {
            field.options.iter().map(|o| o.to_string()).collect()
        }
    }

    fn current_answer_valid(&self) -> bool {
        let field = self.current_field();
        self.answers
            .get(field.key)
            .map(|a| a.is_valid_for(field.kind))
            .unwrap_or(false)
    }

    /// Clears the variety answer when it is no longer in the valid set for
    /// the chosen category.
    fn invalidate_stale_variety(&mut self) {
        let category = match self.answers.get(CATEGORY_FIELD_KEY) {
            Some(AnswerValue::Choice(c)) => c.clone(),
            _ => return,
        };

        let stale = match self.answers.get(VARIETY_FIELD_KEY) {
            Some(AnswerValue::Choice(v)) => !varieties_for(&category).contains(&v.as_str()),
            Some(_) => true,
            None => false,
        };

        if stale {
            self.answers.remove(VARIETY_FIELD_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::InputKind;

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.to_string())
    }

    fn choice(s: &str) -> AnswerValue {
        AnswerValue::Choice(s.to_string())
    }

    /// Drives an owner wizard up to the category step.
    fn wizard_at_category() -> IntakeWizard {
        let mut wizard = IntakeWizard::new(UserChoice::Existing);
        wizard.set_answer(text("Agra")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        wizard.set_answer(text("5000")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        assert_eq!(wizard.current_field().key, "category");
        wizard
    }

    #[test]
    fn test_next_without_answer_is_noop() {
        let mut wizard = IntakeWizard::new(UserChoice::Existing);
        assert_eq!(wizard.next(), StepAdvance::Invalid);
        assert_eq!(wizard.step_index(), 0);

        // Whitespace-only text is still invalid.
        assert!(wizard.set_answer(text("   ")).is_err());
        assert_eq!(wizard.next(), StepAdvance::Invalid);
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn test_back_keeps_answers_and_exits_at_first_step() {
        let mut wizard = IntakeWizard::new(UserChoice::Build);
        wizard.set_answer(text("Pune")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);

        assert_eq!(wizard.back(), StepBack::Moved);
        assert_eq!(wizard.answer("location"), Some(&text("Pune")));
        assert_eq!(wizard.back(), StepBack::Exited);
    }

    #[test]
    fn test_variety_options_derive_from_category() {
        let mut wizard = wizard_at_category();
        wizard.set_answer(choice("Seed Potatoes")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);

        assert_eq!(wizard.current_field().key, "variety");
        let options = wizard.current_options();
        assert!(options.contains(&"Kufri Himalini".to_string()));
        assert!(!options.contains(&"Kufri Chipsona-1".to_string()));

        // An option from a different category is rejected.
        assert!(wizard.set_answer(choice("Kufri Chipsona-1")).is_err());
        wizard.set_answer(choice("Kufri Himalini")).unwrap();
    }

    #[test]
    fn test_category_change_clears_stale_variety_once() {
        let mut wizard = wizard_at_category();
        wizard.set_answer(choice("Table Potatoes")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        wizard.set_answer(choice("Kufri Jyoti")).unwrap();

        // Go back and switch the category; the variety is no longer valid.
        assert_eq!(wizard.back(), StepBack::Moved);
        wizard.set_answer(choice("Processing Potatoes")).unwrap();
        assert_eq!(wizard.answer("variety"), None);

        // Switching again with no stored variety has nothing to clear.
        wizard.set_answer(choice("Seed Potatoes")).unwrap();
        assert_eq!(wizard.answer("variety"), None);
    }

    #[test]
    fn test_category_change_keeps_still_valid_variety() {
        let mut wizard = wizard_at_category();
        wizard.set_answer(choice("Table Potatoes")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        wizard.set_answer(choice("Kufri Jyoti")).unwrap();

        assert_eq!(wizard.back(), StepBack::Moved);
        wizard.set_answer(choice("Table Potatoes")).unwrap();
        assert_eq!(wizard.answer("variety"), Some(&choice("Kufri Jyoti")));
    }

    #[test]
    fn test_complete_owner_flow_submission() {
        let mut wizard = wizard_at_category();
        wizard.set_answer(choice("Table Potatoes")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        wizard.set_answer(choice("Kufri Bahar")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        wizard.set_answer(choice("Long-term table storage")).unwrap();
        assert_eq!(wizard.next(), StepAdvance::Moved);
        wizard
            .set_answer(AnswerValue::MultiChoice(vec![
                "Sprouting".to_string(),
                "Weight loss".to_string(),
            ]))
            .unwrap();

        let advance = wizard.next();
        let StepAdvance::Completed(submission) = advance else {
            panic!("expected completion, got {:?}", advance);
        };
        assert_eq!(submission.user_choice, UserChoice::Existing);
        assert_eq!(submission.answers.len(), 6);
        assert_eq!(
            submission.answers.get("variety"),
            Some(&choice("Kufri Bahar"))
        );

        // The wizard stays on the last step so a failed submission can retry.
        assert_eq!(wizard.step_index(), wizard.step_count() - 1);
        assert!(matches!(wizard.next(), StepAdvance::Completed(_)));
    }

    #[test]
    fn test_multi_select_requires_at_least_one() {
        let mut wizard = IntakeWizard::new(UserChoice::Existing);
        while wizard.current_field().kind != InputKind::MultiSelect {
            let answer = match wizard.current_field().kind {
                InputKind::Text => text("x"),
                InputKind::SingleSelect => {
                    choice(&wizard.current_options().first().unwrap().clone())
                }
                InputKind::MultiSelect => unreachable!(),
            };
            wizard.set_answer(answer).unwrap();
            assert_eq!(wizard.next(), StepAdvance::Moved);
        }

        assert!(wizard.set_answer(AnswerValue::MultiChoice(vec![])).is_err());
        assert_eq!(wizard.next(), StepAdvance::Invalid);
    }
}
