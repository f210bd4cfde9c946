//! OpenAI-compatible chat completion adapter.
//!
//! One POST to `{base_url}/chat/completions` per call, bearer-token
//! authenticated, with a system message and a user message. The request
//! deadline comes from [`ProviderConfig::timeout`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Completion, CompletionProvider, CompletionRequest, ProviderConfig};
use crate::error::GenerationError;

/// Chat completion client for OpenAI and API-compatible servers.
pub struct OpenAiProvider {
    http: Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GenerationError> {
        debug!(model = %self.config.model, max_tokens = request.max_tokens, "complete: sending");

        let response = self
            .http
            .post(self.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_body(&request))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "complete: provider returned error status");
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(transport)?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::MalformedJson {
                raw: text.clone(),
                message: format!("unexpected provider response: {e}"),
            })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(GenerationError::MalformedJson {
                raw: text,
                message: "provider response contained no choices".to_string(),
            });
        };

        let truncated = choice.finish_reason.as_deref() == Some("length");
        debug!(
            finish_reason = ?choice.finish_reason,
            truncated,
            "complete: received"
        );

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            truncated,
        })
    }
}

fn transport(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Transport(format!("request timed out: {err}"))
    } else {
        GenerationError::Transport(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(ProviderConfig::new("test-key").unwrap()).unwrap()
    }

    #[test]
    fn request_body_shape() {
        let provider = provider();
        let request = CompletionRequest {
            system: "JSON only".to_string(),
            prompt: "make a plan".to_string(),
            max_tokens: 975,
            temperature: 0.7,
        };

        let body = serde_json::to_value(provider.build_body(&request)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 975);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "JSON only");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "make a plan");
    }

    #[test]
    fn url_appends_chat_completions() {
        assert_eq!(
            provider().chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn name_is_model() {
        assert_eq!(provider().name(), "gpt-4o-mini");
    }
}
