use std::time::Duration;

use base64::Engine as _;
use popvote_config::SpeechConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SttError};

const DEFAULT_BASE_URL: &str = "https://speech.googleapis.com";

/// Google Cloud Speech-to-Text client over the REST API
pub(crate) struct SpeechProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    language_code: String,
    sample_rate_hertz: u32,
}

/// Best transcription alternative for an upload
#[derive(Debug)]
pub(crate) struct Transcription {
    pub transcript: String,
    pub confidence: f32,
}

/// Wire format for the synchronous recognize request
#[derive(Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    model: &'a str,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Deserialize)]
struct RecognitionAlternative {
    transcript: String,
    #[serde(default)]
    confidence: f32,
}

impl SpeechProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build
    pub fn new(config: &SpeechConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build speech HTTP client: {e}"))?;

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
            language_code: config.language_code.clone(),
            sample_rate_hertz: config.sample_rate_hertz,
        })
    }

    /// Transcribe an audio upload synchronously
    ///
    /// Returns the top alternative of the first result, or `None` when the
    /// API recognized nothing.
    pub async fn recognize(&self, audio: &[u8]) -> Result<Option<Transcription>> {
        let url = format!("{}/v1/speech:recognize", self.base_url);

        let wire_request = RecognizeRequest {
            config: RecognitionConfig {
                // Let the API sniff the container format
                encoding: "ENCODING_UNSPECIFIED",
                sample_rate_hertz: self.sample_rate_hertz,
                language_code: &self.language_code,
                model: "default",
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        };

        tracing::debug!(bytes = audio.len(), language = %self.language_code, "sending recognize request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "recognize request failed");
                SttError::ConnectionError(format!("Failed to send request to Speech-to-Text: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(status = %status, "Speech-to-Text API error");

            return Err(match status.as_u16() {
                401 | 403 => SttError::AuthenticationFailed(error_text),
                400 => SttError::InvalidRequest(error_text),
                _ => SttError::UpstreamApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let wire_response: RecognizeResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse recognize response");
            SttError::InternalError
        })?;

        let transcription = wire_response
            .results
            .into_iter()
            .next()
            .and_then(|result| result.alternatives.into_iter().next())
            .map(|alternative| Transcription {
                transcript: alternative.transcript,
                confidence: alternative.confidence,
            });

        tracing::debug!(recognized = transcription.is_some(), "recognize complete");

        Ok(transcription)
    }
}
