//! REST API router, configuration and server.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::handlers::{chat_handler, health_handler, tables_handler, ApiState};
use crate::chatbot::Chatbot;
use crate::config::ServerConfig;
use crate::error::Result;

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
    /// Allowed origins for CORS; `*` allows any.
    pub cors_origins: Vec<String>,
    /// API prefix.
    pub prefix: String,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            prefix: "/api".to_string(),
        }
    }
}

impl From<&ServerConfig> for RestApiConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            enable_cors: server.enable_cors,
            cors_origins: server.cors_origins.clone(),
            ..Self::default()
        }
    }
}

/// Create the REST API router.
///
/// Endpoints:
/// - POST /api/chat   - Answer a chat message
/// - GET  /api/tables - List tables
/// - GET  /api/health - Health check
pub fn create_router(chatbot: Arc<Chatbot>, config: &RestApiConfig) -> Router {
    let state = Arc::new(ApiState::new(chatbot));

    let api_routes = Router::new()
        .route("/chat", post(chat_handler))
        .route("/tables", get(tables_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let router = Router::new().nest(&config.prefix, api_routes);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(allow_origin(&config.cors_origins));

        router.layer(cors)
    } else {
        router
    }
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return Any.into();
    }
    AllowOrigin::list(
        origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok()),
    )
}

/// Serve the REST API until the process receives Ctrl-C.
pub async fn serve(chatbot: Arc<Chatbot>, config: &ServerConfig) -> Result<()> {
    let app = create_router(chatbot, &RestApiConfig::from(config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
