// Gemini client tests against a mocked HTTP endpoint

use gemvision::chat::{self, CallShape};
use gemvision::config::GeminiConfig;
use gemvision::error::AppError;
use gemvision::gemini::GeminiClient;

fn mock_config(base_url: String) -> GeminiConfig {
    GeminiConfig {
        api_base_url: base_url,
        api_key: Some("AIzaTestKey".to_string()),
        ..GeminiConfig::default()
    }
}

const REPLY_BODY: &str = r#"{
    "candidates": [{
        "content": {"role": "model", "parts": [{"text": "A small red bicycle."}]},
        "finishReason": "STOP"
    }],
    "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 5, "totalTokenCount": 9}
}"#;

#[tokio::test]
async fn test_generate_content_returns_candidates() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .match_header("x-goog-api-key", "AIzaTestKey")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY_BODY)
        .create_async()
        .await;

    let client = GeminiClient::new(&mock_config(server.url())).unwrap();
    let shape = CallShape::from_parts(Some("What is this?".to_string()), None).unwrap();

    let response = client.generate_content(chat::build_request(&shape)).await.unwrap();
    assert_eq!(
        response.candidates[0].content.parts[0].as_text(),
        Some("A small red bicycle.")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_dispatch_normalizes_reply_text() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY_BODY)
        .create_async()
        .await;

    let client = GeminiClient::new(&mock_config(server.url())).unwrap();
    let shape = CallShape::from_parts(Some("What is this?".to_string()), None).unwrap();

    let reply = chat::dispatch(&client, shape).await.unwrap();
    // The candidate's text comes back verbatim
    assert_eq!(reply.text, "A small red bicycle.");
    assert_eq!(reply.model, "gemini-1.5-flash");
}

#[tokio::test]
async fn test_dispatch_falls_back_to_string_form_without_text() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    let client = GeminiClient::new(&mock_config(server.url())).unwrap();
    let shape = CallShape::from_parts(Some("hi".to_string()), None).unwrap();

    let reply = chat::dispatch(&client, shape).await.unwrap();
    assert_eq!(reply.text, r#"{"candidates":[]}"#);
}

#[tokio::test]
async fn test_api_fault_surfaces_with_description() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#)
        .create_async()
        .await;

    let client = GeminiClient::new(&mock_config(server.url())).unwrap();
    let shape = CallShape::from_parts(Some("hi".to_string()), None).unwrap();

    let err = chat::dispatch(&client, shape).await.unwrap_err();
    match &err {
        AppError::GeminiApi(message) => assert!(message.contains("API key not valid.")),
        other => panic!("expected GeminiApi error, got {:?}", other),
    }
    // The rendered fault contains the description
    assert!(format!("{}", err).contains("API key not valid."));
}

#[tokio::test]
async fn test_quota_fault_maps_to_rate_limit() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#)
        .create_async()
        .await;

    let client = GeminiClient::new(&mock_config(server.url())).unwrap();
    let shape = CallShape::from_parts(Some("hi".to_string()), None).unwrap();

    let err = chat::dispatch(&client, shape).await.unwrap_err();
    assert!(matches!(err, AppError::TooManyRequests(_)));
}

#[tokio::test]
async fn test_submission_path_does_not_retry() {
    let mut server = mockito::Server::new_async().await;

    // Expect exactly one hit even for a retryable status
    let mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .with_status(503)
        .with_body(r#"{"error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = GeminiClient::new(&mock_config(server.url())).unwrap();
    let shape = CallShape::from_parts(Some("hi".to_string()), None).unwrap();

    let err = chat::dispatch(&client, shape).await.unwrap_err();
    assert!(matches!(err, AppError::ServiceUnavailable(_)));

    mock.assert_async().await;
}
