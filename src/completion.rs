//! Chat-completion wire format and model output extraction.
//!
//! Only the subset of the provider envelope that the assessment reads is
//! modeled; unknown fields are ignored.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Request body for the chat completions endpoint.
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Single-turn request carrying one user prompt.
    pub fn user_prompt(model: &str, prompt: String, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![Message {
                role: Role::User,
                content: prompt,
            }],
            max_tokens,
        }
    }
}

/// Non-streaming response from chat completions.
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Free-text content of the first choice.
    pub fn into_content(self) -> Result<String> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("response contained no choices"))?;
        choice
            .message
            .content
            .ok_or_else(|| anyhow!("response message has no content"))
    }
}

/// Locate the JSON payload inside model output that may be markdown-fenced.
///
/// Precedence: the first fence labeled `json` up to the next fence, then the
/// first pair of plain fences, then the whole text. Unlabeled fences are taken
/// verbatim, so a language tag other than `json` stays in the payload.
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(start) = text.find(JSON_FENCE) {
        return until_fence(&text[start + JSON_FENCE.len()..]);
    }
    if let Some(start) = text.find(FENCE) {
        return until_fence(&text[start + FENCE.len()..]);
    }
    text
}

fn until_fence(rest: &str) -> &str {
    let end = rest.find(FENCE).unwrap_or(rest.len());
    rest[..end].trim()
}
