/*!
 * Client-visible event model for the streaming pipeline.
 *
 * Events are serialized as single-line JSON payloads inside SSE `data:`
 * frames. The `type` tag and field names are part of the wire contract the
 * demo page and any other client rely on.
 */

use serde::{Deserialize, Serialize};

/// One client-visible event produced by the pipeline.
///
/// `Translation` and sentence-scoped `Error` events carry the sequence index
/// of the sentence they belong to, since translations may complete out of
/// sentence order. Stream-scoped errors have no index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A raw fragment from the generation stream, mirrored 1:1 in source order
    Original {
        /// The fragment text exactly as received
        text: String,
    },
    /// A completed translation for one sentence
    Translation {
        /// Sequence index of the translated sentence
        index: usize,
        /// The translated text
        text: String,
    },
    /// A failure; scoped to one sentence when `index` is present, otherwise
    /// the generation stream itself failed
    Error {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        index: Option<usize>,
        /// Human-readable description
        message: String,
    },
    /// Terminal marker; always the last event of a stream
    Done,
}

impl StreamEvent {
    /// Whether this event terminates the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
