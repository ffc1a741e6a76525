/*!
 * OpenAI-compatible client implementing both pipeline capabilities.
 *
 * Generation uses the streaming chat-completions endpoint and parses the
 * SSE `data:` frames incrementally; translation is a single non-streamed
 * chat completion with a fixed system prompt and an explicit timeout.
 */

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::{FragmentStream, GenerationProvider, TranslationProvider};

/// Client for an OpenAI-compatible chat-completions API
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base endpoint URL, e.g. "https://api.openai.com/v1"
    endpoint: String,
    /// Model used for streamed text generation
    generation_model: String,
    /// Model used for sentence translation
    translation_model: String,
    /// Timeout applied to translation requests
    timeout: Duration,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("endpoint", &self.endpoint)
            .field("generation_model", &self.generation_model)
            .field("translation_model", &self.translation_model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Whether to stream the response
    stream: bool,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatRequest {
    /// Create a new chat request for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            stream: false,
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Request a streamed response
    pub fn streamed(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Non-streamed chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; we only ever use the first
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The completed message
    pub message: ChatMessage,
}

/// One parsed chunk of a streamed chat completion
#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

impl OpenAI {
    /// Create a new client from provider configuration and a resolved API key
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            generation_model: config.generation_model.clone(),
            translation_model: config.translation_model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn classify_status(status_code: u16, message: String) -> ProviderError {
        match status_code {
            401 | 403 => ProviderError::AuthenticationError(message),
            _ => ProviderError::ApiError { status_code, message },
        }
    }
}

/// Map a transport-level failure onto the provider error taxonomy.
///
/// Timeouts and connection failures get their own variants so callers can
/// distinguish them; anything else (malformed request, redirect loop, body
/// error) is a generic request failure.
fn classify_request_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout { seconds: timeout.as_secs() }
    } else if err.is_connect() {
        ProviderError::ConnectionError(err.to_string())
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}

/// Extract the delta content from a single SSE line.
///
/// Returns `None` for non-data lines, empty deltas, the `[DONE]` sentinel,
/// and anything that fails to parse; streamed responses routinely interleave
/// keep-alive and metadata lines that carry no content.
fn parse_delta_line(line: &str) -> Option<String> {
    let json_str = line.strip_prefix("data: ")?;
    let chunk = serde_json::from_str::<StreamChunk>(json_str).ok()?;

    let content: String = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .filter(|c| !c.is_empty())
        .collect();

    if content.is_empty() { None } else { Some(content) }
}

impl GenerationProvider for OpenAI {
    fn stream(&self, prompt: &str) -> FragmentStream {
        let client = self.client.clone();
        let url = self.completions_url();
        let api_key = self.api_key.clone();
        let timeout = self.timeout;
        let request = ChatRequest::new(&self.generation_model)
            .add_message("user", prompt)
            .streamed();

        Box::pin(async_stream::stream! {
            let response = match client
                .post(&url)
                .bearer_auth(&api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    yield Err(classify_request_error(err, timeout));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                yield Err(OpenAI::classify_status(status.as_u16(), body));
                return;
            }

            let mut bytes = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        // Single terminal failure; nothing garbled is delivered.
                        yield Err(ProviderError::ConnectionError(err.to_string()));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line: String = buffer.drain(..=line_end).collect();
                    let line = line.trim();
                    if line == "data: [DONE]" {
                        return;
                    }
                    if let Some(content) = parse_delta_line(line) {
                        yield Ok(content);
                    }
                }
            }
        })
    }
}

#[async_trait]
impl TranslationProvider for OpenAI {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = ChatRequest::new(&self.translation_model)
            .add_message(
                "system",
                format!("Translate to {target_language}. Only output the translation."),
            )
            .add_message("user", text);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| classify_request_error(err, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status.as_u16(), body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::ParseError(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))
    }
}
