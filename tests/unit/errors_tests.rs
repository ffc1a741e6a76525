/*!
 * Tests for error types and conversions
 */

use streamlate::errors::{AppError, PipelineError, ProviderError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_timeout_shouldDisplaySeconds() {
    let error = ProviderError::Timeout { seconds: 30 };
    let display = format!("{}", error);
    assert!(display.contains("timed out"));
    assert!(display.contains("30"));
}

#[test]
fn test_pipelineError_translation_shouldCarrySentenceIndex() {
    let error = PipelineError::Translation {
        index: 2,
        source: ProviderError::ConnectionError("broken pipe".to_string()),
    };
    let display = format!("{}", error);
    assert!(display.contains("sentence 2"));
    assert!(display.contains("broken pipe"));
}

#[test]
fn test_pipelineError_generation_shouldConvertFromProviderError() {
    let error: PipelineError =
        ProviderError::ConnectionError("reset by peer".to_string()).into();
    assert!(matches!(error, PipelineError::Generation(_)));
    assert!(format!("{}", error).contains("Generation stream error"));
}

#[test]
fn test_appError_shouldConvertFromProviderError() {
    let error: AppError = ProviderError::AuthenticationError("bad key".to_string()).into();
    assert!(matches!(error, AppError::Provider(_)));
}

#[test]
fn test_appError_shouldConvertFromAnyhow() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(_)));
    assert!(format!("{}", error).contains("something odd"));
}

#[test]
fn test_appError_config_shouldDisplayMessage() {
    let error = AppError::Config("missing provider endpoint".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Configuration error"));
    assert!(display.contains("missing provider endpoint"));
}

#[test]
fn test_appError_validation_shouldDisplayMessage() {
    let error = AppError::Validation("prompt must not be empty".to_string());
    assert!(format!("{}", error).contains("prompt must not be empty"));
}
