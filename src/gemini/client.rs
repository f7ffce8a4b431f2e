// Gemini Generative Language API client

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Client for the Google Generative Language API.
///
/// Holds the API key and the pooled HTTP client. Construction fails with an
/// explicit error when no key is configured, so the caller decides whether to
/// abort or to run with submission disabled.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiClient {
    /// Create a new Gemini client from an explicit configuration object.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AppError::MissingApiKey)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client with connection pooling and keep-alive");

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key,
        })
    }

    /// The model every submission is sent to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Call Gemini `generateContent` (blocking, one shot).
    ///
    /// Submission faults return immediately; there is no retry on this path.
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.generate_content_with_model(request, &self.config.model)
            .await
    }

    async fn generate_content_with_model(
        &self,
        request: GenerateContentRequest,
        model: &str,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url, model
        );
        debug!("Calling generateContent API for model: {}", model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::GeminiApi(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status, error_text
            );
            let message = Self::extract_error_message(&error_text)
                .unwrap_or_else(|| error_text.clone());
            return Err(match status.as_u16() {
                429 => AppError::TooManyRequests(format!("Gemini API quota exceeded: {}", message)),
                503 | 504 => {
                    AppError::ServiceUnavailable(format!("Upstream unavailable: {}", message))
                }
                _ => AppError::GeminiApi(format!("HTTP {}: {}", status, message)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::GeminiApi(format!("Failed to read response body: {}", e)))?;

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );

        let gemini_response: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                error!("Failed to parse Gemini response: {}", e);
                AppError::GeminiApi(format!("Response parsing error: {}", e))
            })?;

        debug!("Successfully received Gemini response");
        Ok(gemini_response)
    }

    /// Check connectivity to the Gemini API.
    ///
    /// Sends a minimal one-token `generateContent` request to verify the API
    /// is reachable and the key is accepted. Retries transient failures with
    /// backoff; only this probe retries, never user submissions.
    pub async fn check_connectivity(&self) -> Result<Duration> {
        use crate::models::gemini::{Content, GenerationConfig, Part};

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url, self.config.model
        );
        debug!("Checking connectivity via {}", url);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(1),
                temperature: None,
                top_p: None,
                top_k: None,
                stop_sequences: None,
                candidate_count: None,
            }),
        };

        let start = std::time::Instant::now();

        // Clone for retry closure
        let http_client = self.http_client.clone();
        let api_key = self.api_key.clone();

        crate::utils::retry::with_retry("Connectivity check", self.config.max_retries, || async {
            let response = http_client
                .post(&url)
                .header("x-goog-api-key", &api_key)
                .header("Content-Type", "application/json")
                .json(&request)
                .timeout(Duration::from_secs(15))
                .send()
                .await
                .map_err(|e| (500, format!("HTTP error: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                let message = Self::extract_error_message(&error_text)
                    .unwrap_or_else(|| error_text.clone());
                return Err((status.as_u16(), message));
            }

            Ok(())
        })
        .await
        .map_err(|(status, body)| match status {
            401 | 403 => AppError::MissingApiKey,
            429 => AppError::TooManyRequests(body),
            503 | 504 => AppError::ServiceUnavailable(format!("Upstream unavailable: {}", body)),
            _ => AppError::GeminiApi(format!("HTTP {}: {}", status, body)),
        })?;

        let latency = start.elapsed();
        debug!("API connectivity check passed in {:?}", latency);

        Ok(latency)
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.status);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: key.map(String::from),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_missing_key_is_explicit_failure() {
        assert!(matches!(
            GeminiClient::new(&config_with_key(None)),
            Err(AppError::MissingApiKey)
        ));
        assert!(matches!(
            GeminiClient::new(&config_with_key(Some("  "))),
            Err(AppError::MissingApiKey)
        ));
    }

    #[test]
    fn test_client_with_key_builds() {
        let client = GeminiClient::new(&config_with_key(Some("AIzaTest"))).unwrap();
        assert_eq!(client.model(), "gemini-1.5-flash");
        assert!(client.base_url().starts_with("https://generativelanguage"));
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GeminiClient::extract_error_message(body).as_deref(),
            Some("API key not valid.")
        );
        assert_eq!(GeminiClient::extract_error_message("not json"), None);
    }
}
