/*!
 * Capability traits for the upstream services the pipeline depends on.
 *
 * Two narrow interfaces keep the orchestrator independent of any concrete
 * API: a streaming text-generation capability and a request/response
 * translation capability. The OpenAI-backed implementation lives in
 * `providers::openai`; deterministic mocks for tests in `providers::mock`.
 */

use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

use crate::errors::ProviderError;

/// A lazy sequence of text fragments from a generation stream.
///
/// The stream ends naturally when generation completes. A mid-stream failure
/// surfaces as a single `Err` item followed by the end of the stream; no
/// partial fragment is delivered after it. Dropping the stream aborts the
/// underlying provider call.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Streaming text-generation capability
pub trait GenerationProvider: Send + Sync + Debug {
    /// Start generating text for a prompt, yielding fragments in arrival order
    fn stream(&self, prompt: &str) -> FragmentStream;
}

/// Sentence translation capability
///
/// One call per sentence, stateless between calls. Implementations apply
/// their own request timeout but never retry; retry policy belongs to the
/// caller.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate `text` into `target_language`
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;
}

pub mod mock;
pub mod openai;
