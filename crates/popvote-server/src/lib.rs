#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod cors;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use popvote_config::Config;
use popvote_storage::ObjectStore;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend or an upstream client fails
    /// to initialize
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = popvote_storage::build_store(&config.storage)?;
        Self::with_store(config, store)
    }

    /// Build the server over an existing storage backend
    ///
    /// Lets tests seed the backend before the server starts.
    ///
    /// # Errors
    ///
    /// Returns an error if an upstream client fails to initialize
    pub fn with_store(config: Config, store: Arc<dyn ObjectStore>) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        // Build base router with feature routes
        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Voting and image retrieval always run; they need only storage
        let votes_state = popvote_votes::build_server(Arc::clone(&store));
        app = app.merge(popvote_votes::endpoint_router().with_state(votes_state));

        // Chat and image generation require OpenAI credentials
        if let Some(ref openai_config) = config.openai {
            let chat_state = popvote_chat::build_server(openai_config)?;
            app = app.merge(popvote_chat::endpoint_router().with_state(chat_state));

            let imagegen_state = popvote_imagegen::build_server(openai_config, Arc::clone(&store))?;
            app = app.merge(popvote_imagegen::endpoint_router().with_state(imagegen_state));
        }

        // Transcription requires Speech-to-Text credentials
        if let Some(ref speech_config) = config.speech {
            let stt_state = popvote_stt::build_server(speech_config)?;
            app = app.merge(popvote_stt::endpoint_router().with_state(stt_state));
        }

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
