//! Intake field descriptors and typed answer values.

use serde::{Deserialize, Serialize};

/// Which advisory path the user chose before the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserChoice {
    /// The user already operates a cold storage ("existing" on the wire).
    Existing,
    /// The user plans to build one ("build" on the wire).
    Build,
}

impl UserChoice {
    /// The wire value the backend expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Build => "build",
        }
    }
}

/// How a field collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    /// Free text, valid when non-empty after trimming.
    Text,
    /// Exactly one option from the active option set.
    SingleSelect,
    /// One or more options from the active option set.
    MultiSelect,
}

/// A single step of the intake questionnaire.
///
/// Field descriptors are built in code, never parsed from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Stable identifier, also used for option derivation.
    pub id: &'static str,
    /// Key under which the answer is submitted.
    pub key: &'static str,
    /// The question shown to the user.
    pub question: &'static str,
    /// Optional clarification below the question.
    pub subtext: Option<&'static str>,
    /// Input kind of the field.
    pub kind: InputKind,
    /// Placeholder for text inputs.
    pub placeholder: Option<&'static str>,
    /// Static option set; empty for text fields and for fields whose options
    /// are derived from an earlier answer.
    pub options: &'static [&'static str],
}

/// A validated answer, tagged by the input kind that produced it.
///
/// Serializes untagged so the submitted intake map carries plain strings and
/// arrays, which is the shape the backend stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free-text answer.
    Text(String),
    /// A single chosen option.
    Choice(String),
    /// One or more chosen options.
    MultiChoice(Vec<String>),
}

impl AnswerValue {
    /// Returns true if this answer satisfies the given input kind.
    pub fn is_valid_for(&self, kind: InputKind) -> bool {
        match (kind, self) {
            (InputKind::Text, Self::Text(s)) => !s.trim().is_empty(),
            (InputKind::SingleSelect, Self::Choice(s)) => !s.is_empty(),
            (InputKind::MultiSelect, Self::MultiChoice(v)) => !v.is_empty(),
            _ => false,
        }
    }
}
