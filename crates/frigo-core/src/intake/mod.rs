//! Intake domain: the structured questionnaire collected before advisory
//! chat begins.
//!
//! The wizard walks an ordered list of typed fields, supports back
//! navigation and a category-dependent option set, and finishes by producing
//! one atomic submission.

mod field;
mod flow;
mod wizard;

pub use field::{AnswerValue, FormField, InputKind, UserChoice};
pub use flow::{builder_flow, owner_flow, varieties_for, CATEGORY_FIELD_KEY, VARIETY_FIELD_KEY};
pub use wizard::{IntakeSubmission, IntakeWizard, StepAdvance, StepBack};
