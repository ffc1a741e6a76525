/*!
 * # streamlate - Real-time Streaming Translation Pipeline
 *
 * A Rust server that streams generated text from an LLM and concurrently
 * translates completed sentences, emitting both original and translated text
 * to the client over a single SSE stream as they become available.
 *
 * ## How it works
 *
 * - The generation provider streams text fragments for a prompt
 * - Fragments are mirrored to the client immediately and fed to a sentence
 *   segmenter (character-based boundary detection on `.`, `!`, `?`)
 * - Each completed sentence is dispatched as a concurrent translation job
 *   while the generation stream keeps flowing
 * - Translation results are emitted as they complete (or reordered by
 *   sentence index, if configured), followed by a terminal `done` event
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pipeline`: The streaming pipeline core:
 *   - `pipeline::segmenter`: Incremental sentence boundary detection
 *   - `pipeline::event`: The client-visible event model
 *   - `pipeline::orchestrator`: Per-request state machine and multiplexing
 * - `providers`: Capability adapters for the upstream services:
 *   - `providers::openai`: OpenAI-compatible generation + translation client
 *   - `providers::mock`: Deterministic providers for testing
 * - `web`: axum HTTP server, SSE handler and the embedded demo page
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod pipeline;
pub mod providers;
pub mod web;

// Re-export main types for easier usage
pub use app_config::{Config, TranslationOrdering};
pub use errors::{AppError, PipelineError, ProviderError};
pub use pipeline::{Orchestrator, PipelineRequest, PipelineSettings, SentenceSegmenter, StreamEvent};
