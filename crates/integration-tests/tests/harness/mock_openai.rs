//! Mock OpenAI backend server for integration tests
//!
//! Implements minimal chat-completion and image-generation endpoints that
//! return canned responses

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Bytes every generated image decodes to
pub const MOCK_IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmock image payload";

/// Mock OpenAI backend that returns predictable responses
pub struct MockOpenAi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockOpenAiState>,
}

struct MockOpenAiState {
    chat_count: AtomicU32,
    imagegen_count: AtomicU32,
    /// Status every request fails with (0 = succeed)
    fail_status: u16,
    /// Custom chat reply content (if set)
    reply_content: Option<String>,
}

impl MockOpenAi {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, None).await
    }

    /// Start a mock server with a custom chat reply
    pub async fn start_with_reply(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, Some(content.to_owned())).await
    }

    /// Start a mock server that fails every request with the given status
    pub async fn start_failing(status: u16) -> anyhow::Result<Self> {
        Self::start_inner(status, None).await
    }

    async fn start_inner(fail_status: u16, reply_content: Option<String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockOpenAiState {
            chat_count: AtomicU32::new(0),
            imagegen_count: AtomicU32::new(0),
            fail_status,
            reply_content,
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/images/generations", routing::post(handle_imagegen))
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
    /// Includes `/v1` since the clients append paths like `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of chat completion requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    /// Number of image generation requests received
    pub fn imagegen_count(&self) -> u32 {
        self.state.imagegen_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockOpenAi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching OpenAI format --

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    #[allow(dead_code)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[allow(dead_code)]
    role: String,
    #[allow(dead_code)]
    content: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionResponse {
    id: String,
    object: String,
    created: u64,
    model: String,
    choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct Choice {
    index: u32,
    message: ResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ResponseMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ImageGenRequest {
    #[allow(dead_code)]
    prompt: String,
    #[allow(dead_code)]
    model: String,
    #[allow(dead_code)]
    size: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenResponse {
    created: u64,
    data: Vec<ImageData>,
}

#[derive(Debug, Serialize)]
struct ImageData {
    b64_json: String,
}

// -- Handlers --

fn failure_response(status: u16) -> axum::response::Response {
    (
        StatusCode::from_u16(status).unwrap(),
        Json(serde_json::json!({
            "error": {
                "message": "mock server intentional failure",
                "type": "server_error"
            }
        })),
    )
        .into_response()
}

async fn handle_chat_completions(
    State(state): State<Arc<MockOpenAiState>>,
    Json(req): Json<ChatCompletionRequest>,
) -> impl IntoResponse {
    state.chat_count.fetch_add(1, Ordering::Relaxed);

    if state.fail_status != 0 {
        return failure_response(state.fail_status);
    }

    let content = state.reply_content.as_deref().unwrap_or("Hello from mock OpenAI");

    let response = ChatCompletionResponse {
        id: "chatcmpl-test-123".to_owned(),
        object: "chat.completion".to_owned(),
        created: 1_700_000_000,
        model: req.model,
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_owned(),
                content: content.to_owned(),
            },
            finish_reason: "stop".to_owned(),
        }],
    };

    Json(response).into_response()
}

async fn handle_imagegen(
    State(state): State<Arc<MockOpenAiState>>,
    Json(_req): Json<ImageGenRequest>,
) -> impl IntoResponse {
    state.imagegen_count.fetch_add(1, Ordering::Relaxed);

    if state.fail_status != 0 {
        return failure_response(state.fail_status);
    }

    let response = ImageGenResponse {
        created: 1_700_000_000,
        data: vec![ImageData {
            b64_json: base64::engine::general_purpose::STANDARD.encode(MOCK_IMAGE_BYTES),
        }],
    };

    Json(response).into_response()
}
