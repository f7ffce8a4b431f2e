// Retry logic for the startup connectivity probe.
// User submissions are never retried; only the probe goes through here.

use backoff::{backoff::Backoff, ExponentialBackoff};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Parse Google's retryDelay duration string (e.g., "0.457639761s", "40s")
/// from an error body. Returns the duration, capped at 60 seconds.
pub fn parse_retry_delay(error_json: &str) -> Option<Duration> {
    let parsed: Value = serde_json::from_str(error_json).ok()?;

    // Navigate: error.details[] -> find RetryInfo -> retryDelay
    let details = parsed.get("error")?.get("details")?.as_array()?;

    for detail in details {
        if detail.get("@type")?.as_str()? == "type.googleapis.com/google.rpc.RetryInfo" {
            if let Some(retry_delay) = detail.get("retryDelay").and_then(|v| v.as_str()) {
                return parse_duration_string(retry_delay);
            }
        }
    }

    None
}

/// Parse duration strings like "0.457639761s", "40s", "1.5s"
fn parse_duration_string(duration_str: &str) -> Option<Duration> {
    let seconds_str = duration_str.strip_suffix('s')?;
    let seconds: f64 = seconds_str.parse().ok()?;

    // Cap at 60 seconds
    let capped_seconds = seconds.min(60.0);

    let millis = (capped_seconds * 1000.0) as u64;
    Some(Duration::from_millis(millis))
}

/// Create exponential backoff configuration for the probe
fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(500),
        initial_interval: Duration::from_millis(500),
        randomization_factor: 0.3,
        multiplier: 2.0,
        max_interval: Duration::from_secs(30),
        max_elapsed_time: Some(Duration::from_secs(120)),
        ..Default::default()
    }
}

/// Determine if an HTTP status code is retryable
pub fn is_retryable(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Execute the probe with retry on transient failures.
/// Uses Google's retryDelay hint when present, exponential backoff otherwise.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    max_attempts: u32,
    mut operation: F,
) -> Result<T, (u16, String)>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, (u16, String)>>,
{
    let mut backoff = create_backoff();
    let mut attempt = 0;
    let max_attempts = max_attempts.max(1);

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err((status, error_body)) => {
                if !is_retryable(status) || attempt >= max_attempts {
                    return Err((status, error_body));
                }

                let delay = if let Some(google_delay) = parse_retry_delay(&error_body) {
                    debug!(
                        "{} failed with {} (attempt {}), upstream suggests waiting {}ms",
                        operation_name,
                        status,
                        attempt,
                        google_delay.as_millis()
                    );
                    google_delay
                } else {
                    let backoff_delay = backoff.next_backoff().unwrap_or(Duration::from_secs(30));
                    debug!(
                        "{} failed with {} (attempt {}), retrying after {}ms",
                        operation_name,
                        status,
                        attempt,
                        backoff_delay.as_millis()
                    );
                    backoff_delay
                };

                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_delay() {
        let error_json = r#"{
  "error": {
    "code": 429,
    "message": "Rate limited",
    "details": [
      {
        "@type": "type.googleapis.com/google.rpc.RetryInfo",
        "retryDelay": "0.457639761s"
      }
    ]
  }
}"#;
        let delay = parse_retry_delay(error_json).unwrap();
        assert_eq!(delay.as_millis(), 457);
    }

    #[test]
    fn test_parse_duration_string() {
        assert_eq!(parse_duration_string("40s").unwrap().as_secs(), 40);
        assert_eq!(parse_duration_string("1.5s").unwrap().as_millis(), 1500);

        // Cap at 60s
        assert_eq!(parse_duration_string("120s").unwrap().as_secs(), 60);
    }

    #[test]
    fn test_is_retryable() {
        assert!(is_retryable(429));
        assert!(is_retryable(503));
        assert!(!is_retryable(400));
        assert!(!is_retryable(404));
    }

    #[tokio::test]
    async fn test_non_retryable_status_fails_immediately() {
        let mut calls = 0u32;
        let result: Result<(), _> = with_retry("test", 5, || {
            calls += 1;
            async move { Err((400u16, "bad request".to_string())) }
        })
        .await;

        assert_eq!(result.unwrap_err().0, 400);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_retryable_status_respects_max_attempts() {
        let mut calls = 0u32;
        let result: Result<(), _> = with_retry("test", 2, || {
            calls += 1;
            async move { Err((503u16, "unavailable".to_string())) }
        })
        .await;

        assert_eq!(result.unwrap_err().0, 503);
        assert_eq!(calls, 2);
    }
}
