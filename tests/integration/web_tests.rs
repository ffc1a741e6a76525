/*!
 * HTTP server tests: validation, SSE wire format, health, and cancellation
 * behavior when the client walks away mid-stream.
 */

use std::time::Duration;

use futures::StreamExt;
use serde_json::{json, Value};
use streamlate::app_config::Config;
use streamlate::pipeline::StreamEvent;
use streamlate::providers::mock::{MockGeneration, MockTranslation};

use crate::common::{parse_sse_body, spawn_test_server};

fn test_config() -> Config {
    Config::default()
}

#[tokio::test]
async fn test_health_shouldReportOk() {
    let addr = spawn_test_server(
        test_config(),
        MockGeneration::new(Vec::<String>::new()),
        MockTranslation::working(),
    )
    .await;

    let body: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("request health")
        .json()
        .await
        .expect("parse health body");
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_index_shouldServeDemoPage() {
    let addr = spawn_test_server(
        test_config(),
        MockGeneration::new(Vec::<String>::new()),
        MockTranslation::working(),
    )
    .await;

    let response = reqwest::get(format!("http://{addr}/")).await.expect("request index");
    assert!(response.status().is_success());
    let body = response.text().await.expect("read body");
    assert!(body.contains("translate-stream"));
}

#[tokio::test]
async fn test_emptyPrompt_shouldReturn400BeforeStreaming() {
    let addr = spawn_test_server(
        test_config(),
        MockGeneration::new(["should never stream."]),
        MockTranslation::working(),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/translate-stream"))
        .json(&json!({ "prompt": "   ", "language": "French" }))
        .send()
        .await
        .expect("send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("parse error body");
    assert!(body["error"].as_str().unwrap_or_default().contains("prompt"));
}

#[tokio::test]
async fn test_emptyLanguage_shouldReturn400() {
    let addr = spawn_test_server(
        test_config(),
        MockGeneration::new(["should never stream."]),
        MockTranslation::working(),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/translate-stream"))
        .json(&json!({ "prompt": "Tell a story", "language": "" }))
        .send()
        .await
        .expect("send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_translateStream_shouldDeliverFullEventSequence() {
    let addr = spawn_test_server(
        test_config(),
        MockGeneration::new(["Hello.", " How are you?", " Bye"]),
        MockTranslation::working(),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/translate-stream"))
        .json(&json!({ "prompt": "greet me", "language": "French" }))
        .send()
        .await
        .expect("send request");

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let body = response.text().await.expect("read full stream");
    let events = parse_sse_body(&body);

    let originals: String = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Original { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(originals, "Hello. How are you? Bye");

    let mut translated: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Translation { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    translated.sort_unstable();
    assert_eq!(translated, vec![0, 1, 2]);
    assert_eq!(events.last(), Some(&StreamEvent::Done));
}

#[tokio::test]
async fn test_translateStream_shouldSurfaceScopedErrorsOnTheWire() {
    let addr = spawn_test_server(
        test_config(),
        MockGeneration::new(["Good one. Bad one. Fine one."]),
        MockTranslation::failing_on("Bad"),
    )
    .await;

    let client = reqwest::Client::new();
    let body = client
        .post(format!("http://{addr}/translate-stream"))
        .json(&json!({ "prompt": "mixed", "language": "German" }))
        .send()
        .await
        .expect("send request")
        .text()
        .await
        .expect("read stream");

    let events = parse_sse_body(&body);
    assert!(events
        .iter()
        .any(|e| matches!(e, StreamEvent::Error { index: Some(1), .. })));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, StreamEvent::Translation { .. }))
            .count(),
        2
    );
    assert_eq!(events.last(), Some(&StreamEvent::Done));
}

#[tokio::test]
async fn test_clientDisconnect_shouldAbortGenerationWithoutCrashing() {
    let generation = MockGeneration::new((0..100).map(|i| format!("part {i}. ")))
        .with_fragment_delay(Duration::from_millis(10));
    let addr = spawn_test_server(test_config(), generation.clone(), MockTranslation::working()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/translate-stream"))
        .json(&json!({ "prompt": "long story", "language": "French" }))
        .send()
        .await
        .expect("send request");

    // Read a little of the stream, then drop the connection.
    let mut stream = response.bytes_stream();
    let first = stream.next().await;
    assert!(first.is_some());
    drop(stream);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let stalled_at = generation.fragments_yielded();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(generation.fragments_yielded(), stalled_at);
    assert!(stalled_at < 100);

    // The server is still healthy afterwards.
    let health: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("health after disconnect")
        .json()
        .await
        .expect("parse health");
    assert_eq!(health["status"], "ok");
}
