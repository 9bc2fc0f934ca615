use std::time::Duration;

use popvote_config::OpenAiConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` chat completion client
pub(crate) struct ChatProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

/// Wire format for the `OpenAI` chat completion request
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build
    pub fn new(config: &OpenAiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.chat_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build chat HTTP client: {e}"))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            model: config.chat_model.clone(),
        })
    }

    /// Send a single-user-message conversation and return the reply text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let wire_request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat completion request failed");
                ChatError::ConnectionError(format!("Failed to send request to OpenAI: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(status = %status, "OpenAI chat API error");

            return Err(match status.as_u16() {
                401 => ChatError::AuthenticationFailed(error_text),
                _ => ChatError::UpstreamApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse chat completion response");
            ChatError::InternalError
        })?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::InternalError)?;

        tracing::debug!("chat completion complete");

        Ok(reply)
    }
}
