/*!
 * Request handlers for the translation pipeline endpoints.
 */

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::response::sse::{Event, Sse};
use axum::response::{Html, IntoResponse};
use axum::Json;
use futures::{Stream, StreamExt};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::pipeline::{Orchestrator, PipelineRequest, PipelineSettings, StreamEvent};
use crate::web::{page, AppState};

/// Request body for `POST /translate-stream`
#[derive(Debug, Deserialize)]
pub struct TranslateStreamRequest {
    /// The generation prompt
    pub prompt: String,
    /// Target language for translations
    pub language: String,
}

/// `GET /` — embedded demo page
pub async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

/// `GET /health` — liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /translate-stream` — the streaming translation endpoint.
///
/// Validation happens before any streaming starts, so malformed requests get
/// a plain 400 instead of an SSE stream. Once validation passes, the
/// response is an SSE stream of pipeline events that ends with a `done`
/// (or stream-scoped `error` then `done`) frame.
pub async fn translate_stream(
    State(state): State<AppState>,
    Json(request): Json<TranslateStreamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = request.prompt.trim().to_string();
    let language = request.language.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }
    if language.is_empty() {
        return Err(AppError::Validation("language must not be empty".to_string()));
    }

    info!(
        "translate-stream: {} prompt chars, target language '{}'",
        prompt.len(),
        language
    );

    let orchestrator = Orchestrator::new(
        Arc::clone(&state.generation),
        Arc::clone(&state.translation),
        PipelineSettings::from_config(&state.config),
    );
    let events = orchestrator.run(PipelineRequest { prompt, language });

    // Proxies buffer SSE unless told otherwise.
    let headers = [
        (header::CACHE_CONTROL, "no-cache"),
        (HeaderName::from_static("x-accel-buffering"), "no"),
    ];
    Ok((headers, Sse::new(into_sse(events))))
}

/// Serialize pipeline events into SSE `data:` frames
fn into_sse(
    events: impl Stream<Item = StreamEvent> + Send + 'static,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    events.map(|event| {
        let payload = serde_json::to_string(&event).unwrap_or_else(|err| {
            error!("failed to serialize stream event: {}", err);
            json!({ "type": "error", "message": "internal serialization error" }).to_string()
        });
        Ok(Event::default().data(payload))
    })
}
