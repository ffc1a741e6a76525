/*!
 * The streaming pipeline core.
 *
 * - `segmenter`: incremental sentence boundary detection
 * - `event`: the client-visible event model
 * - `orchestrator`: the per-request state machine that multiplexes the
 *   generation stream and concurrent translation jobs into one event stream
 */

pub mod event;
pub mod orchestrator;
pub mod segmenter;

pub use event::StreamEvent;
pub use orchestrator::{Orchestrator, PipelineRequest, PipelineSettings};
pub use segmenter::{Sentence, SentenceSegmenter};
