/*!
 * Tests for configuration loading, defaults and validation
 */

use streamlate::app_config::{Config, TranslationOrdering};

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_config_shouldRoundTripThroughFile() {
    let temp_dir = create_temp_dir().expect("create temp dir");
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.port = 9999;
    config.pipeline.translation_ordering = TranslationOrdering::Sequence;
    config.provider.generation_model = "gpt-4-turbo".to_string();

    config.save_to_file(&path).expect("save config");
    let loaded = Config::from_file(&path).expect("load config");

    assert_eq!(loaded.port, 9999);
    assert_eq!(loaded.pipeline.translation_ordering, TranslationOrdering::Sequence);
    assert_eq!(loaded.provider.generation_model, "gpt-4-turbo");
}

#[test]
fn test_config_fromFile_shouldFailOnMissingFile() {
    let temp_dir = create_temp_dir().expect("create temp dir");
    let result = Config::from_file(temp_dir.path().join("does-not-exist.json"));
    assert!(result.is_err());
}

#[test]
fn test_config_fromFile_shouldFailOnInvalidJson() {
    let temp_dir = create_temp_dir().expect("create temp dir");
    let path = create_test_file(&temp_dir, "invalid.json", "{ not json").expect("write file");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_fromFile_shouldRejectInvalidValues() {
    let temp_dir = create_temp_dir().expect("create temp dir");
    let path = create_test_file(
        &temp_dir,
        "badvalues.json",
        r#"{ "pipeline": { "max_concurrent_translations": 0 } }"#,
    )
    .expect("write file");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_shouldParseOrderingFromLowercase() {
    let config: Config = serde_json::from_str(
        r#"{ "pipeline": { "translation_ordering": "sequence" } }"#,
    )
    .expect("parse config");
    assert_eq!(config.pipeline.translation_ordering, TranslationOrdering::Sequence);
}

#[test]
fn test_config_apiKey_shouldFallBackToFileValue() {
    // Note: does not exercise the env override to avoid mutating process
    // environment in a parallel test run.
    let mut config = Config::default();
    assert!(config.resolved_api_key().is_none() || std::env::var("OPENAI_API_KEY").is_ok());
    config.provider.api_key = "sk-from-file".to_string();
    if std::env::var("OPENAI_API_KEY").is_err() {
        assert_eq!(config.resolved_api_key().as_deref(), Some("sk-from-file"));
    }
}
