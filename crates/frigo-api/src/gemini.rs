//! Direct Gemini advisory variant.
//!
//! Instead of going through the advisory backend, this client talks to the
//! Gemini REST API itself: the intake answers become the system instruction,
//! Google Search grounding is enabled, and each reply carries the grounding
//! sources so they can be cited to the user.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use frigo_core::error::{FrigoError, Result};
use frigo_core::intake::{AnswerValue, IntakeSubmission, UserChoice};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.4;

const SYSTEM_INSTRUCTION_BASE: &str = "You are a cold-storage advisory expert \
for potato storage facilities in India. Give practical, specific guidance on \
storage conditions, facility planning, subsidies and operations. Keep answers \
concise and actionable.";

/// A web source the model grounded its answer on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// A Gemini reply together with its grounding citations.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedReply {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// A stateful advisory conversation against the Gemini API.
///
/// The full turn history is resent with every request, which is how the API
/// models multi-turn chat.
pub struct GeminiChat {
    client: Client,
    api_key: String,
    model: String,
    system_instruction: String,
    history: Vec<Content>,
}

impl GeminiChat {
    /// Creates a conversation primed with the user's intake answers.
    ///
    /// Model name defaults to `gemini-2.5-flash` when `model` is `None`.
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        submission: &IntakeSubmission,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            system_instruction: build_system_instruction(submission),
            history: Vec::new(),
        }
    }

    /// Sends one user message and returns the grounded reply.
    pub async fn send(&mut self, message: &str) -> Result<GroundedReply> {
        self.history.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: message.to_string(),
            }],
        });

        let request = GenerateContentRequest {
            contents: self.history.clone(),
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: self.system_instruction.clone(),
                }],
            }),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let reply = self.send_request(&request).await?;

        self.history.push(Content {
            role: "model".to_string(),
            parts: vec![Part {
                text: reply.text.clone(),
            }],
        });
        Ok(reply)
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<GroundedReply> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let response = self.client.post(url).json(body).send().await.map_err(|err| {
            FrigoError::Transport(format!("Gemini API request failed: {err}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            FrigoError::api(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_grounded_reply(parsed)
    }
}

fn render_answer(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Text(s) | AnswerValue::Choice(s) => s.clone(),
        AnswerValue::MultiChoice(values) => values.join(", "),
    }
}

/// Builds the system instruction from the intake answers, including the
/// weather protocol for the user's location.
fn build_system_instruction(submission: &IntakeSubmission) -> String {
    let profile = match submission.user_choice {
        UserChoice::Existing => "EXISTING COLD STORAGE OWNER",
        UserChoice::Build => "NEW COLD STORAGE BUILDER",
    };

    let mut context = format!("USER PROFILE: {}\n", profile);
    for (key, value) in &submission.answers {
        context.push_str(&format!("- {}: {}\n", key, render_answer(value)));
    }

    let location = submission
        .answers
        .get("location")
        .map(render_answer)
        .unwrap_or_else(|| "the user's region".to_string());

    format!(
        "{base}\n\n\
         WEATHER & CLIMATE PROTOCOL:\n\
         1. Use Google Search to check the current weather, humidity, and 7-day forecast for {location}.\n\
         2. In your first greeting, provide a brief \"Local Storage Weather Advisory\" based on these real-time conditions.\n\
         3. If the humidity is high or temperatures are unusual for this region, warn the user about potential storage risks (sprouting, rot).\n\n\
         CURRENT USER CONTEXT:\n{context}",
        base = SYSTEM_INSTRUCTION_BASE,
        location = location,
        context = context,
    )
}

#[derive(Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    tools: Vec<Tool>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Clone, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Clone, Serialize)]
struct GoogleSearch {}

#[derive(Clone, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_grounded_reply(response: GenerateContentResponse) -> Result<GroundedReply> {
    let candidate = response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        })
        .ok_or_else(|| {
            FrigoError::api("Gemini API returned no candidates in the response")
        })?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            FrigoError::api("Gemini API returned no text in the response candidates")
        })?;

    let sources: Vec<GroundingSource> = candidate
        .grounding_metadata
        .map(|metadata| {
            metadata
                .grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| match (web.uri, web.title) {
                    (Some(uri), title) => Some(GroundingSource {
                        uri,
                        title: title.unwrap_or_default(),
                    }),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    debug!(sources = sources.len(), "Gemini reply extracted");
    Ok(GroundedReply { text, sources })
}

fn map_http_error(status: StatusCode, body: String) -> FrigoError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    FrigoError::api_status(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn submission() -> IntakeSubmission {
        let mut answers = BTreeMap::new();
        answers.insert(
            "location".to_string(),
            AnswerValue::Text("Agra".to_string()),
        );
        answers.insert(
            "variety".to_string(),
            AnswerValue::Choice("Kufri Jyoti".to_string()),
        );
        answers.insert(
            "current_problems".to_string(),
            AnswerValue::MultiChoice(vec!["Sprouting".to_string(), "Weight loss".to_string()]),
        );
        IntakeSubmission {
            user_choice: UserChoice::Existing,
            answers,
        }
    }

    #[test]
    fn test_system_instruction_carries_context_and_location() {
        let instruction = build_system_instruction(&submission());
        assert!(instruction.contains("EXISTING COLD STORAGE OWNER"));
        assert!(instruction.contains("7-day forecast for Agra"));
        assert!(instruction.contains("- variety: Kufri Jyoti"));
        assert!(instruction.contains("- current_problems: Sprouting, Weight loss"));
    }

    #[test]
    fn test_grounding_sources_extracted() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Store at 2-4C." }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.org/storage", "title": "Storage guide" } },
                        { "web": { "uri": "https://example.org/untitled" } },
                        { "retrievedContext": {} }
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let reply = extract_grounded_reply(response).unwrap();
        assert_eq!(reply.text, "Store at 2-4C.");
        assert_eq!(reply.sources.len(), 2);
        assert_eq!(reply.sources[0].uri, "https://example.org/storage");
        assert_eq!(reply.sources[0].title, "Storage guide");
        assert_eq!(reply.sources[1].title, "");
    }

    #[test]
    fn test_reply_without_grounding_has_no_sources() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello." }] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let reply = extract_grounded_reply(response).unwrap();
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(extract_grounded_reply(response).is_err());
    }

    #[test]
    fn test_http_error_mapping_prefers_wrapped_message() {
        let body = serde_json::json!({
            "error": { "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })
        .to_string();

        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert!(err.is_transient());
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED: quota exceeded"));
    }
}
