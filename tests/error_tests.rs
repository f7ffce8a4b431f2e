// Error handling tests

use gemvision::error::AppError;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        AppError::MissingApiKey,
        AppError::NoInput,
        AppError::Image("Unrecognized image data".to_string()),
        AppError::GeminiApi("API error".to_string()),
        AppError::InvalidRequest("Bad request".to_string()),
        AppError::TooManyRequests("Rate limited".to_string()),
        AppError::ServiceUnavailable("Service down".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_missing_key_names_the_variable() {
    let error = AppError::MissingApiKey;
    assert!(format!("{}", error).contains("GOOGLE_API_KEY"));
}

#[test]
fn test_no_input_asks_for_one() {
    let error = AppError::NoInput;
    let display = format!("{}", error);
    assert!(display.contains("upload an image"));
    assert!(display.contains("text prompt"));
}

#[test]
fn test_fault_description_is_preserved() {
    // Whatever fault is raised, its description survives into the rendered string
    let error = AppError::GeminiApi("Connection refused".to_string());
    assert!(format!("{}", error).contains("Connection refused"));

    let error = AppError::Image("Could not decode image/webp image: corrupt header".to_string());
    assert!(format!("{}", error).contains("corrupt header"));
}

#[test]
fn test_rate_limit_error() {
    let error = AppError::TooManyRequests("Quota exceeded".to_string());
    assert!(format!("{}", error).contains("Quota exceeded"));
}

#[test]
fn test_service_unavailable_error() {
    let error = AppError::ServiceUnavailable("Backend down".to_string());
    assert!(format!("{}", error).contains("Backend down"));
}
