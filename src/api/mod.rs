//! HTTP API server for the chat widget

pub mod chat;
pub mod health;
pub mod page;
pub mod tts;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::conversation::Conversation;
use crate::speech::SpeechGateway;

/// Shared state for API handlers
///
/// Every handle is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct ApiState {
    pub conversation: Conversation,
    pub speech: SpeechGateway,
    /// Whether the service account loaded at startup
    pub credentials_available: bool,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    conversation: Conversation,
    speech: SpeechGateway,
    credentials_available: bool,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(conversation: Conversation, port: u16) -> Self {
        Self {
            conversation,
            speech: SpeechGateway::default(),
            credentials_available: false,
            port,
            static_dir: None,
        }
    }

    /// Set the speech gateway
    #[must_use]
    pub fn speech(mut self, speech: SpeechGateway) -> Self {
        self.speech = speech;
        self
    }

    /// Record whether credentials were loaded
    #[must_use]
    pub const fn credentials_available(mut self, available: bool) -> Self {
        self.credentials_available = available;
        self
    }

    /// Set the static files directory for serving the widget
    #[must_use]
    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            conversation: self.conversation,
            speech: self.speech,
            credentials_available: self.credentials_available,
        });

        ApiServer {
            state,
            port: self.port,
            static_dir: self.static_dir,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let router = Router::new()
            .merge(page::router(self.state.clone(), self.static_dir.as_deref()))
            .merge(chat::router(self.state.clone()))
            .merge(tts::router(self.state.clone()))
            .merge(health::router())
            .merge(health::ready_router(self.state.clone()));

        // The widget is embedded on other origins
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
