use std::time::Duration;

use base64::Engine as _;
use popvote_config::OpenAiConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ImageGenError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` image generation client
pub(crate) struct ImageClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

/// Wire format for the `OpenAI` image generation request
#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

impl ImageClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build
    pub fn new(config: &OpenAiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.image_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build image HTTP client: {e}"))?;

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
            model: config.image_model.clone(),
        })
    }

    /// Generate one image and return its decoded bytes
    pub async fn generate(&self, prompt: &str, size: Option<&str>) -> Result<Vec<u8>> {
        let url = format!("{}/images/generations", self.base_url);

        let wire_request = ImageGenerationRequest {
            model: &self.model,
            prompt,
            size,
        };

        tracing::debug!(model = %self.model, "sending image generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "image generation request failed");
                ImageGenError::ConnectionError(format!("Failed to send request to OpenAI: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(status = %status, "OpenAI image generation API error");

            return Err(match status.as_u16() {
                400 => ImageGenError::InvalidRequest(error_text),
                401 => ImageGenError::AuthenticationFailed(error_text),
                _ => ImageGenError::UpstreamApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let wire_response: ImageGenerationResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse image generation response");
            ImageGenError::InternalError
        })?;

        let encoded = wire_response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or(ImageGenError::InternalError)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| {
                tracing::error!(error = %e, "image payload is not valid base64");
                ImageGenError::InternalError
            })?;

        tracing::debug!(bytes = bytes.len(), "image generation complete");

        Ok(bytes)
    }
}
