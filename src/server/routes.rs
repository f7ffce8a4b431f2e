// HTTP routes configuration

use super::handlers::{generate_handler, health_handler, index_handler};
use crate::config::AppConfig;
use crate::error::Result;
use crate::gemini::GeminiClient;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// `None` when no API key was configured; submission is disabled but the
    /// page and health report stay up.
    pub gemini_client: Option<Arc<GeminiClient>>,
}

pub fn create_router(config: AppConfig, gemini_client: Option<GeminiClient>) -> Result<Router> {
    let max_body = config.server.max_upload_bytes;

    let state = AppState {
        config,
        gemini_client: gemini_client.map(Arc::new),
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        // Uploads arrive as multipart bodies; lift axum's default cap and
        // enforce the configured one instead
        .layer(DefaultBodyLimit::max(max_body))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    Ok(app)
}
