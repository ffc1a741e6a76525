/*!
 * Sentence boundary detection over an incremental fragment stream.
 *
 * The segmenter accumulates text fragments and cuts out complete sentences
 * whenever a terminating character (`.`, `!`, `?`) appears. Detection is
 * purely character based: decimal numbers and abbreviations are not
 * special-cased. That matches the upstream behavior this pipeline mirrors
 * and is a documented limitation, not something to silently improve.
 */

/// Sentence terminators recognized by the segmenter
const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// A complete, boundary-terminated unit of text ready for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// The sentence text, trimmed of surrounding whitespace
    pub text: String,
    /// Monotonically increasing sequence index assigned at creation
    pub index: usize,
}

/// Incremental sentence segmenter with an internal accumulating buffer
#[derive(Debug, Default)]
pub struct SentenceSegmenter {
    buffer: String,
    next_index: usize,
}

impl SentenceSegmenter {
    /// Create a segmenter with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return any sentences it completed.
    ///
    /// Each terminator found cuts the buffer up to and including it. A cut
    /// whose content before the terminator is empty (for example the second
    /// and third dots of an ellipsis) is dropped without consuming a
    /// sequence index.
    pub fn push(&mut self, fragment: &str) -> Vec<Sentence> {
        self.buffer.push_str(fragment);

        let mut completed = Vec::new();
        // Earlier pushes consumed every terminator they saw, so any match
        // here sits in the newly appended region. Terminators are single
        // ASCII bytes, which keeps the drain on a char boundary.
        while let Some(pos) = self.buffer.find(TERMINATORS) {
            let cut: String = self.buffer.drain(..=pos).collect();
            let text = cut.trim();
            if !text.trim_end_matches(TERMINATORS).trim_end().is_empty() {
                completed.push(Sentence {
                    text: text.to_string(),
                    index: self.next_index,
                });
                self.next_index += 1;
            }
        }
        completed
    }

    /// Flush whatever remains in the buffer as a final sentence.
    ///
    /// Called at end-of-stream; the remainder does not need a terminator.
    /// Returns `None` if the buffer holds only whitespace.
    pub fn flush(&mut self) -> Option<Sentence> {
        let text = self.buffer.trim().to_string();
        self.buffer.clear();
        if text.is_empty() {
            return None;
        }
        let sentence = Sentence {
            text,
            index: self.next_index,
        };
        self.next_index += 1;
        Some(sentence)
    }

    /// Number of sentences produced so far
    pub fn sentence_count(&self) -> usize {
        self.next_index
    }

    /// Whether the buffer currently holds undelivered text
    pub fn has_pending(&self) -> bool {
        !self.buffer.trim().is_empty()
    }
}
