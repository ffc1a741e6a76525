/*!
 * Per-request pipeline orchestrator.
 *
 * One orchestrator serves exactly one client request and owns all of its
 * state: the segmenter, the in-flight translation jobs, and the event
 * channel. The state machine runs Idle -> Streaming -> Draining -> Closed.
 * While streaming, every fragment is mirrored to the client immediately and
 * fed to the segmenter; each completed sentence is dispatched as a
 * translation job that races the generation stream. Draining lets every
 * dispatched job finish after generation ends, and Closed is reached once
 * the terminal event has been emitted.
 */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_stream::wrappers::ReceiverStream;

use crate::app_config::{Config, TranslationOrdering};
use crate::errors::{PipelineError, ProviderError};
use crate::pipeline::event::StreamEvent;
use crate::pipeline::segmenter::{Sentence, SentenceSegmenter};
use crate::providers::{GenerationProvider, TranslationProvider};

/// Capacity of the event channel; sends block once the client falls this far
/// behind, which is how transport backpressure reaches the pipeline.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A single client request to the pipeline
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// The generation prompt
    pub prompt: String,
    /// Target language for translations
    pub language: String,
}

/// Tuning knobs for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Maximum in-flight translation jobs
    pub max_concurrent_translations: usize,
    /// Per-job timeout; a timeout counts as a failed job
    pub job_timeout: Duration,
    /// Whether translations are emitted on completion or in sentence order
    pub ordering: TranslationOrdering,
}

impl PipelineSettings {
    /// Derive settings from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent_translations: config.pipeline.max_concurrent_translations,
            job_timeout: Duration::from_secs(config.provider.timeout_secs),
            ordering: config.pipeline.translation_ordering,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrent_translations: 4,
            job_timeout: Duration::from_secs(30),
            ordering: TranslationOrdering::Completion,
        }
    }
}

/// Result of one translation job: the sentence index and its outcome
type JobOutcome = (usize, Result<String, ProviderError>);

/// Per-request pipeline coordinator
pub struct Orchestrator {
    generation: Arc<dyn GenerationProvider>,
    translation: Arc<dyn TranslationProvider>,
    settings: PipelineSettings,
}

impl Orchestrator {
    /// Create an orchestrator for a single request
    pub fn new(
        generation: Arc<dyn GenerationProvider>,
        translation: Arc<dyn TranslationProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            generation,
            translation,
            settings,
        }
    }

    /// Run the pipeline, returning the ordered stream of client events.
    ///
    /// The coordinating task runs until the terminal event is emitted or the
    /// returned stream is dropped. Dropping the stream is the cancellation
    /// signal: the coordinator notices the closed channel on its next send,
    /// stops pulling fragments (which aborts the generation call) and drops
    /// its job set (which aborts in-flight translation calls).
    pub fn run(self, request: PipelineRequest) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            self.drive(request, tx).await;
        });
        ReceiverStream::new(rx)
    }

    /// The coordinating task: state machine plus event multiplexing
    async fn drive(self, request: PipelineRequest, tx: mpsc::Sender<StreamEvent>) {
        let mut sink = EventSink::new(tx, self.settings.ordering);
        let mut segmenter = SentenceSegmenter::new();
        let mut jobs: JoinSet<JobOutcome> = JoinSet::new();
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent_translations));
        let mut generation = self.generation.stream(&request.prompt);
        let mut stream_failure: Option<ProviderError> = None;

        info!(
            "pipeline started: target language '{}', ordering {}",
            request.language, self.settings.ordering
        );

        // Streaming: race the generation stream against completing jobs so
        // that a finished translation is forwarded without waiting for the
        // next fragment.
        loop {
            tokio::select! {
                next = generation.next() => match next {
                    Some(Ok(fragment)) => {
                        if !sink.emit(StreamEvent::Original { text: fragment.clone() }).await {
                            return;
                        }
                        for sentence in segmenter.push(&fragment) {
                            self.dispatch(&mut jobs, &semaphore, sentence, &request.language);
                        }
                    }
                    Some(Err(err)) => {
                        warn!("generation stream failed: {}", err);
                        stream_failure = Some(err);
                        break;
                    }
                    None => break,
                },
                Some(joined) = jobs.join_next(), if !jobs.is_empty() => {
                    if !forward(&mut sink, joined).await {
                        return;
                    }
                }
            }
        }

        // Closes the upstream generation call.
        drop(generation);

        // Draining: the remainder becomes one final job, but only after a
        // clean end; a failed stream drains already-dispatched jobs only.
        if stream_failure.is_none() {
            if let Some(sentence) = segmenter.flush() {
                self.dispatch(&mut jobs, &semaphore, sentence, &request.language);
            }
        }
        debug!(
            "pipeline draining: {} sentence(s) dispatched, {} job(s) still in flight",
            segmenter.sentence_count(),
            jobs.len()
        );

        while let Some(joined) = jobs.join_next().await {
            if !forward(&mut sink, joined).await {
                return;
            }
        }

        if !sink.release_held().await {
            return;
        }
        if let Some(err) = stream_failure {
            let failure = PipelineError::Generation(err);
            let emitted = sink
                .emit(StreamEvent::Error { index: None, message: failure.to_string() })
                .await;
            if !emitted {
                return;
            }
        }
        let _ = sink.emit(StreamEvent::Done).await;
        info!("pipeline closed: {} sentence(s) processed", segmenter.sentence_count());
    }

    /// Spawn a translation job for one sentence.
    ///
    /// Spawning never blocks the caller; the concurrency permit is acquired
    /// inside the job so fragment consumption keeps flowing while jobs
    /// queue up behind the semaphore.
    fn dispatch(
        &self,
        jobs: &mut JoinSet<JobOutcome>,
        semaphore: &Arc<Semaphore>,
        sentence: Sentence,
        language: &str,
    ) {
        let translation = Arc::clone(&self.translation);
        let semaphore = Arc::clone(semaphore);
        let language = language.to_string();
        let job_timeout = self.settings.job_timeout;

        debug!(
            "dispatching translation job {} ({} chars)",
            sentence.index,
            sentence.text.len()
        );
        jobs.spawn(async move {
            let _permit = semaphore.acquire_owned().await.unwrap();
            let outcome = match tokio::time::timeout(
                job_timeout,
                translation.translate(&sentence.text, &language),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout { seconds: job_timeout.as_secs() }),
            };
            (sentence.index, outcome)
        });
    }
}

/// Forward one completed job to the sink. Returns false once the client is
/// gone and the pipeline should stop.
async fn forward(sink: &mut EventSink, joined: Result<JobOutcome, JoinError>) -> bool {
    match joined {
        Ok((index, Ok(text))) => {
            sink.emit_for_sentence(index, StreamEvent::Translation { index, text })
                .await
        }
        Ok((index, Err(err))) => {
            let failure = PipelineError::Translation { index, source: err };
            warn!("{}", failure);
            sink.emit_for_sentence(
                index,
                StreamEvent::Error { index: Some(index), message: failure.to_string() },
            )
            .await
        }
        Err(err) => {
            // A panicked or aborted job has no result to emit; the pipeline
            // itself keeps going.
            error!("translation task did not complete: {}", err);
            true
        }
    }
}

/// Event channel wrapper that applies the configured translation ordering.
///
/// Original, stream-error and terminal events always pass straight through.
/// Sentence-scoped events either pass through (`Completion`) or wait in a
/// reorder buffer until every lower sentence index has been emitted
/// (`Sequence`).
struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
    ordering: TranslationOrdering,
    next_sequenced: usize,
    held: BTreeMap<usize, StreamEvent>,
}

impl EventSink {
    fn new(tx: mpsc::Sender<StreamEvent>, ordering: TranslationOrdering) -> Self {
        Self {
            tx,
            ordering,
            next_sequenced: 0,
            held: BTreeMap::new(),
        }
    }

    /// Send an event directly. Returns false if the client disconnected.
    async fn emit(&mut self, event: StreamEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Send a sentence-scoped event, honoring the ordering policy.
    async fn emit_for_sentence(&mut self, index: usize, event: StreamEvent) -> bool {
        match self.ordering {
            TranslationOrdering::Completion => self.emit(event).await,
            TranslationOrdering::Sequence => {
                self.held.insert(index, event);
                while let Some(event) = self.held.remove(&self.next_sequenced) {
                    if !self.emit(event).await {
                        return false;
                    }
                    self.next_sequenced += 1;
                }
                true
            }
        }
    }

    /// Emit anything still waiting in the reorder buffer, in index order.
    ///
    /// Only reachable when a job vanished without an outcome (panic or
    /// abort) and left a gap in the sequence; the results behind the gap
    /// must still reach the client before the terminal event.
    async fn release_held(&mut self) -> bool {
        let held = std::mem::take(&mut self.held);
        for (_, event) in held {
            if !self.emit(event).await {
                return false;
            }
        }
        true
    }
}
