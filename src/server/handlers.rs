// HTTP request handlers

use super::routes::AppState;
use crate::chat::{self, CallShape};
use crate::error::{AppError, Result};
use crate::vision::encode_png;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// The single-page UI, compiled into the binary.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Health report. The page reads the `api_key` check to decide whether
/// submission is enabled.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let api_key_check = match &state.gemini_client {
        Some(client) => HealthCheck {
            status: "ok".to_string(),
            message: format!("API key configured, model: {}", client.model()),
        },
        None => {
            overall_status = HealthStatus::Degraded;
            HealthCheck {
                status: "error".to_string(),
                message: "GOOGLE_API_KEY is missing. Submission is disabled.".to_string(),
            }
        }
    };
    checks.insert("api_key".to_string(), api_key_check);

    let config_check = HealthCheck {
        status: "ok".to_string(),
        message: format!("API base: {}", state.config.gemini.api_base_url),
    };
    checks.insert("configuration".to_string(), config_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    pub model: String,
    pub elapsed_ms: u128,
}

/// Handler for the submission endpoint.
///
/// Accepts a multipart form with two optional fields: `prompt` (text) and
/// `image` (file). At least one must be present; the image is re-encoded to
/// PNG before dispatch. One remote call per submission.
pub async fn generate_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>> {
    let submission_id = format!("sub_{}", uuid::Uuid::new_v4().simple());

    let (prompt, image_bytes) = read_submission(multipart).await?;

    info!(
        "{}: received submission (prompt: {}, image: {})",
        submission_id,
        prompt.as_deref().map(str::len).unwrap_or(0),
        image_bytes.as_ref().map(Bytes::len).unwrap_or(0)
    );

    // Missing credential blocks submission without taking the server down
    let client = state.gemini_client.as_ref().ok_or(AppError::MissingApiKey)?;

    let image = match image_bytes {
        Some(bytes) => Some(encode_png(&bytes)?),
        None => None,
    };

    let shape = CallShape::from_parts(prompt, image)?;
    let reply = chat::dispatch(client, shape).await?;

    debug!("{}: reply delivered", submission_id);

    Ok(Json(GenerateResponse {
        text: reply.text,
        model: reply.model,
        elapsed_ms: reply.elapsed_ms,
    }))
}

/// Pull the two known fields out of the multipart form.
///
/// Empty values (a blank prompt box, a file input with nothing chosen) are
/// treated as absent so shape classification sees the user's real intent.
async fn read_submission(mut multipart: Multipart) -> Result<(Option<String>, Option<Bytes>)> {
    let mut prompt: Option<String> = None;
    let mut image_bytes: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Unreadable prompt field: {}", e)))?;
                if !text.trim().is_empty() {
                    prompt = Some(text);
                }
            }
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Unreadable image field: {}", e)))?;
                if !bytes.is_empty() {
                    image_bytes = Some(bytes);
                }
            }
            other => {
                debug!("Ignoring unknown multipart field: {:?}", other);
            }
        }
    }

    Ok((prompt, image_bytes))
}
