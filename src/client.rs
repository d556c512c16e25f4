//! Remote assessment client.
//!
//! Sends one chat-completion request per step and turns the reply into a
//! result fragment. Every failure is folded into an `AssessmentError`; nothing
//! below this seam reaches the caller as a raw error.
use crate::assessment::{AssessmentError, ResultFragment, StepResult, PARSE_FAILURE_MESSAGE};
use crate::completion::{extract_json_payload, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::ProviderConfig;
use crate::step::AssessmentStep;
use crate::util::truncate_string;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::time::Instant;

const LOG_PREVIEW_BYTES: usize = 500;

/// Fetches the result of a single assessment step for a brand.
pub trait AssessmentClient {
    /// Blocks until the remote call settles.
    fn fetch_step(&self, brand_name: &str, step: AssessmentStep) -> StepResult;
}

/// Client backed by an OpenAI-compatible chat completions endpoint.
pub struct HttpAssessmentClient {
    config: ProviderConfig,
    agent: ureq::Agent,
}

impl HttpAssessmentClient {
    pub fn new(config: ProviderConfig) -> Self {
        // Non-2xx statuses come back as responses, not transport errors.
        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            config,
            agent: ureq::Agent::new_with_config(agent_config),
        }
    }

    /// POST the prompt and return the model's message content.
    fn request_content(&self, prompt: String) -> Result<String> {
        let request =
            ChatCompletionRequest::user_prompt(&self.config.model, prompt, self.config.max_tokens);
        let mut response = self
            .agent
            .post(self.config.endpoint.as_str())
            .header("Authorization", self.config.bearer())
            .send_json(&request)
            .context("send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %truncate_string(&body, LOG_PREVIEW_BYTES),
                "chat completion request rejected"
            );
            return Err(anyhow!("API request failed"));
        }

        let envelope: ChatCompletionResponse = response
            .body_mut()
            .read_json()
            .context("read chat completion response")?;
        envelope.into_content()
    }
}

impl AssessmentClient for HttpAssessmentClient {
    fn fetch_step(&self, brand_name: &str, step: AssessmentStep) -> StepResult {
        let prompt = step.prompt(brand_name);
        let prompt_bytes = prompt.len();
        let start = Instant::now();

        let content = match self.request_content(prompt) {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(%step, error = %format!("{err:#}"), "assessment request failed");
                return Err(AssessmentError::from_cause(&err));
            }
        };

        let result = parse_fragment(step, &content);
        tracing::info!(
            %step,
            elapsed_ms = start.elapsed().as_millis(),
            prompt_bytes,
            response_bytes = content.len(),
            ok = result.is_ok(),
            "assessment step complete"
        );
        result
    }
}

/// Extract and parse the JSON payload from model output.
///
/// Only a JSON object is a fragment. An object carrying an `error` key is the
/// model reporting failure and becomes an `AssessmentError`.
pub(crate) fn parse_fragment(step: AssessmentStep, content: &str) -> StepResult {
    let payload = extract_json_payload(content);
    let value = match serde_json::from_str::<Value>(payload) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(
                %step,
                error = %err,
                attempted = %truncate_string(payload, LOG_PREVIEW_BYTES),
                "failed to parse model response"
            );
            return Err(AssessmentError::parse_failure());
        }
    };

    let Some(fields) = value.as_object() else {
        tracing::error!(
            %step,
            attempted = %truncate_string(payload, LOG_PREVIEW_BYTES),
            "model response is not a JSON object"
        );
        return Err(AssessmentError::parse_failure());
    };
    if fields.contains_key("error") {
        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(PARSE_FAILURE_MESSAGE);
        tracing::warn!(%step, message, "model reported an error");
        return Err(AssessmentError::new(message));
    }
    Ok(ResultFragment::new(step, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(endpoint: String) -> ProviderConfig {
        ProviderConfig {
            endpoint,
            model: "test-model".to_string(),
            api_key: Some("test-key".to_string()),
            max_tokens: 4000,
        }
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "cmpl-1",
            "object": "chat.completion",
            "model": "test-model",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": content}
            }]
        })
    }

    #[test]
    fn fenced_reply_becomes_fragment() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key")
                .json_body_partial(r#"{"model":"test-model","max_tokens":4000}"#)
                .body_contains("Calculate a sustainability score for Acme.");
            then.status(200)
                .json_body(completion("Here you go:\n```json\n{\"score\":42}\n```"));
        });

        let client = HttpAssessmentClient::new(config_for(server.url("/chat/completions")));
        let fragment = client
            .fetch_step("Acme", AssessmentStep::Scoring)
            .expect("fragment");

        mock.assert();
        assert_eq!(fragment.step, AssessmentStep::Scoring);
        assert_eq!(fragment.payload, json!({"score": 42}));
    }

    #[test]
    fn request_carries_single_user_message() {
        let server = MockServer::start();
        let prompt = AssessmentStep::Initial.prompt("Acme");
        let expected = json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": 4000
        });
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions").json_body(expected);
            then.status(200).json_body(completion("{\"sources\":[]}"));
        });

        let client = HttpAssessmentClient::new(config_for(server.url("/chat/completions")));
        let fragment = client
            .fetch_step("Acme", AssessmentStep::Initial)
            .expect("fragment");

        mock.assert();
        assert_eq!(fragment.payload, json!({"sources": []}));
    }

    #[test]
    fn http_failure_status_becomes_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).body("unauthorized");
        });

        let client = HttpAssessmentClient::new(config_for(server.url("/chat/completions")));
        let error = client
            .fetch_step("Acme", AssessmentStep::Detailed)
            .expect_err("error");

        mock.assert();
        assert_eq!(error.error, "AssessmentError");
        assert_eq!(error.message, "API request failed");
    }

    #[test]
    fn unparsable_reply_becomes_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion("not json"));
        });

        let client = HttpAssessmentClient::new(config_for(server.url("/chat/completions")));
        let error = client
            .fetch_step("Acme", AssessmentStep::FactCheck)
            .expect_err("error");
        assert_eq!(error.message, PARSE_FAILURE_MESSAGE);
    }

    #[test]
    fn malformed_envelope_becomes_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        });

        let client = HttpAssessmentClient::new(config_for(server.url("/chat/completions")));
        let error = client
            .fetch_step("Acme", AssessmentStep::Initial)
            .expect_err("error");
        assert!(error.message.contains("no choices"), "{}", error.message);
    }

    #[test]
    fn connection_failure_becomes_error() {
        let client =
            HttpAssessmentClient::new(config_for("http://127.0.0.1:1/chat/completions".into()));
        let error = client
            .fetch_step("Acme", AssessmentStep::Initial)
            .expect_err("error");
        assert!(
            error.message.starts_with("send chat completion request"),
            "{}",
            error.message
        );
    }

    #[test]
    fn unfenced_json_is_parsed_whole() {
        let fragment =
            parse_fragment(AssessmentStep::Scoring, " {\"score\": 7, \"category\": \"Low\"} ")
                .expect("fragment");
        assert_eq!(fragment.payload, json!({"score": 7, "category": "Low"}));
    }

    #[test]
    fn error_shaped_reply_becomes_error() {
        let error = parse_fragment(
            AssessmentStep::Initial,
            "```json\n{\"error\":\"NotFound\",\"message\":\"No such brand\"}\n```",
        )
        .expect_err("error");
        assert_eq!(error.error, "AssessmentError");
        assert_eq!(error.message, "No such brand");

        let error = parse_fragment(AssessmentStep::Initial, "{\"error\": true}").expect_err("error");
        assert_eq!(error.message, PARSE_FAILURE_MESSAGE);
    }

    #[test]
    fn non_object_reply_becomes_parse_error() {
        for content in ["42", "null", "\"just text\"", "[1, 2]"] {
            let error = parse_fragment(AssessmentStep::Scoring, content).expect_err(content);
            assert_eq!(error.message, PARSE_FAILURE_MESSAGE, "{content}");
        }
    }

    #[test]
    fn error_reply_from_provider_fails_the_step() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion(
                "```json\n{\"error\":\"AssessmentError\",\"message\":\"Brand not found\"}\n```",
            ));
        });

        let client = HttpAssessmentClient::new(config_for(server.url("/chat/completions")));
        let error = client
            .fetch_step("Acme", AssessmentStep::Detailed)
            .expect_err("error");
        assert_eq!(error.message, "Brand not found");
    }
}
