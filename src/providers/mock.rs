/*!
 * Mock provider implementations for testing.
 *
 * `MockGeneration` replays a scripted fragment sequence (optionally paced,
 * optionally failing mid-stream) and counts how far consumers actually
 * pulled, which lets cancellation tests assert the stream was dropped.
 * `MockTranslation` simulates the translation capability with configurable
 * behaviors and records every request it receives.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{FragmentStream, GenerationProvider, TranslationProvider};

/// Scripted generation stream for tests
#[derive(Debug, Clone)]
pub struct MockGeneration {
    /// Fragments to replay, in order
    fragments: Vec<String>,
    /// Fail with a stream error after this many fragments
    fail_after: Option<usize>,
    /// Delay before each fragment, to simulate a slow upstream
    fragment_delay: Option<Duration>,
    /// How many fragments consumers have pulled so far
    yielded: Arc<AtomicUsize>,
}

impl MockGeneration {
    /// Replay the given fragments and then end cleanly
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            fail_after: None,
            fragment_delay: None,
            yielded: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail with a stream error after `count` fragments have been delivered
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Sleep this long before each fragment
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = Some(delay);
        self
    }

    /// Number of fragments pulled from this provider so far.
    ///
    /// Shared across clones, so a test can keep a handle while the pipeline
    /// owns another.
    pub fn fragments_yielded(&self) -> usize {
        self.yielded.load(Ordering::SeqCst)
    }
}

impl GenerationProvider for MockGeneration {
    fn stream(&self, _prompt: &str) -> FragmentStream {
        let fragments = self.fragments.clone();
        let fail_after = self.fail_after;
        let delay = self.fragment_delay;
        let yielded = Arc::clone(&self.yielded);

        let total = self.fragments.len();
        Box::pin(async_stream::stream! {
            for (position, fragment) in fragments.into_iter().enumerate() {
                if fail_after == Some(position) {
                    yield Err(ProviderError::ConnectionError(
                        "simulated generation stream failure".to_string(),
                    ));
                    return;
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                yielded.fetch_add(1, Ordering::SeqCst);
                yield Ok(fragment);
            }
            // A threshold at or past the end means "fail after everything".
            if fail_after.is_some_and(|count| count >= total) {
                yield Err(ProviderError::ConnectionError(
                    "simulated generation stream failure".to_string(),
                ));
            }
        })
    }
}

/// Behavior mode for the mock translation provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockTranslationBehavior {
    /// Always succeeds, echoing `[<language>] <text>`
    Working,
    /// Always fails with an API error
    Failing,
    /// Fails only for sentences containing the given substring
    FailMatching(String),
    /// Succeeds after sleeping, for timeout and ordering tests
    Slow {
        /// Milliseconds to sleep before answering
        delay_ms: u64,
    },
    /// Per-sentence delays keyed by substring, so completion order can be
    /// scrambled deterministically; unmatched sentences answer immediately
    StaggeredDelays(Vec<(String, u64)>),
}

/// Mock translation provider for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockTranslation {
    /// Behavior mode
    behavior: MockTranslationBehavior,
    /// Every (text, target_language) pair received, in call order
    requests: Arc<Mutex<Vec<(String, String)>>>,
    /// Total calls, shared across clones
    call_count: Arc<AtomicUsize>,
}

impl MockTranslation {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockTranslationBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockTranslationBehavior::Working)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockTranslationBehavior::Failing)
    }

    /// Create a mock that fails for sentences containing `needle`
    pub fn failing_on(needle: impl Into<String>) -> Self {
        Self::new(MockTranslationBehavior::FailMatching(needle.into()))
    }

    /// Create a slow mock, for timeout testing
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockTranslationBehavior::Slow { delay_ms })
    }

    /// The requests recorded so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Just the sentence texts recorded so far, sorted for set comparison
    pub fn dispatched_sentences(&self) -> Vec<String> {
        let mut texts: Vec<String> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect();
        texts.sort();
        texts
    }

    /// Total number of translate calls
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockTranslation {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), target_language.to_string()));

        match &self.behavior {
            MockTranslationBehavior::Working => {
                Ok(format!("[{target_language}] {text}"))
            }

            MockTranslationBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "simulated translation failure".to_string(),
            }),

            MockTranslationBehavior::FailMatching(needle) => {
                if text.contains(needle.as_str()) {
                    Err(ProviderError::ApiError {
                        status_code: 500,
                        message: format!("simulated failure for sentence containing '{needle}'"),
                    })
                } else {
                    Ok(format!("[{target_language}] {text}"))
                }
            }

            MockTranslationBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(format!("[{target_language}] {text}"))
            }

            MockTranslationBehavior::StaggeredDelays(delays) => {
                let delay = delays
                    .iter()
                    .find(|(needle, _)| text.contains(needle.as_str()))
                    .map(|(_, ms)| *ms)
                    .unwrap_or(0);
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Ok(format!("[{target_language}] {text}"))
            }
        }
    }
}
