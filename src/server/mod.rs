//! Axum-based HTTP server for the vision chat.
//!
//! Serves the single-page UI at `/`, the health report at `/health`, and the
//! submission endpoint at `/api/generate`.
//!
//! # Components
//!
//! - `handlers`: The three endpoints.
//! - `routes`: Router configuration and the shared application state.

mod handlers;
mod routes;

pub use handlers::{GenerateResponse, HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
