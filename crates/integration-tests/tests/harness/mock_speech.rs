//! Mock Speech-to-Text backend server for integration tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Transcript every successful recognition returns
pub const MOCK_TRANSCRIPT: &str = "こんにちは世界";

/// Confidence every successful recognition returns
pub const MOCK_CONFIDENCE: f32 = 0.92;

/// Mock Speech-to-Text backend that returns predictable responses
pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockSpeechState>,
}

struct MockSpeechState {
    recognize_count: AtomicU32,
    /// Whether to return an empty result list
    empty_results: bool,
}

impl MockSpeech {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(false).await
    }

    /// Start a mock server that recognizes nothing
    pub async fn start_empty() -> anyhow::Result<Self> {
        Self::start_inner(true).await
    }

    async fn start_inner(empty_results: bool) -> anyhow::Result<Self> {
        let state = Arc::new(MockSpeechState {
            recognize_count: AtomicU32::new(0),
            empty_results,
        });

        let app = Router::new()
            .route("/v1/speech:recognize", routing::post(handle_recognize))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a backend
    ///
    /// Excludes `/v1` since the client appends `/v1/speech:recognize`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of recognize requests received
    pub fn recognize_count(&self) -> u32 {
        self.state.recognize_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching the Speech-to-Text REST format --

#[derive(Debug, Deserialize)]
struct RecognizeRequest {
    #[allow(dead_code)]
    config: serde_json::Value,
    audio: RecognitionAudio,
}

#[derive(Debug, Deserialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Serialize)]
struct RecognitionResult {
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Serialize)]
struct RecognitionAlternative {
    transcript: String,
    confidence: f32,
}

async fn handle_recognize(
    State(state): State<Arc<MockSpeechState>>,
    Json(req): Json<RecognizeRequest>,
) -> impl IntoResponse {
    state.recognize_count.fetch_add(1, Ordering::Relaxed);

    // Requests with no audio payload recognize nothing
    let results = if state.empty_results || req.audio.content.is_empty() {
        Vec::new()
    } else {
        vec![RecognitionResult {
            alternatives: vec![RecognitionAlternative {
                transcript: MOCK_TRANSCRIPT.to_owned(),
                confidence: MOCK_CONFIDENCE,
            }],
        }]
    };

    Json(RecognizeResponse { results })
}
