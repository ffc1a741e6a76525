/*!
 * Common test utilities for the streamlate test suite
 */

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use tempfile::TempDir;

use streamlate::app_config::Config;
use streamlate::pipeline::{Orchestrator, PipelineRequest, PipelineSettings, StreamEvent};
use streamlate::providers::mock::{MockGeneration, MockTranslation};
use streamlate::web::server::create_app;
use streamlate::web::AppState;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.path().join(filename);
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Run a full pipeline against mock providers and collect every event
pub async fn run_pipeline(
    generation: MockGeneration,
    translation: MockTranslation,
    settings: PipelineSettings,
    language: &str,
) -> Vec<StreamEvent> {
    Orchestrator::new(Arc::new(generation), Arc::new(translation), settings)
        .run(PipelineRequest {
            prompt: "test prompt".to_string(),
            language: language.to_string(),
        })
        .collect()
        .await
}

/// Extract and concatenate all `original` payloads
pub fn concatenated_originals(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Original { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Extract (index, text) pairs from `translation` events, in emission order
pub fn translations(events: &[StreamEvent]) -> Vec<(usize, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Translation { index, text } => Some((*index, text.clone())),
            _ => None,
        })
        .collect()
}

/// Serve the application router on an ephemeral port; returns the address
pub async fn spawn_test_server(
    config: Config,
    generation: MockGeneration,
    translation: MockTranslation,
) -> SocketAddr {
    let state = AppState::new(config, Arc::new(generation), Arc::new(translation));
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    addr
}

/// Parse the JSON payloads out of a raw SSE body
pub fn parse_sse_body(body: &str) -> Vec<StreamEvent> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|payload| serde_json::from_str(payload).expect("valid event payload"))
        .collect()
}
