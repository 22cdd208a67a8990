//! Transcript models produced by the speech-to-text boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single word with timing, as emitted by word-level alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Word text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Alignment confidence (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

/// A time-bounded span of speech with a stable integer id.
///
/// Ids are unique and monotonically increasing in transcript order, but a
/// transcript is allowed to carry gaps in the id sequence (e.g. after
/// filtering out music-only spans).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Unique id, monotonically increasing in transcript order
    pub id: u32,
    /// Spoken text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (always > start)
    pub end: f64,
    /// Word-level timings, may be empty for coarse transcribers
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Full transcription result for one source video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Detected or requested language code
    pub language: String,
    /// Total media duration in seconds
    pub duration: f64,
    /// Ordered segments
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Build an id -> segment lookup for timeline resolution.
    pub fn segment_index(&self) -> HashMap<u32, &TranscriptSegment> {
        self.segments.iter().map(|s| (s.id, s)).collect()
    }

    /// Render the transcript in the `[id] (start-end s) text` form the
    /// generative model is prompted with.
    ///
    /// Start is floored and end is ceiled so the model sees whole seconds.
    pub fn formatted(&self) -> String {
        let mut lines = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            lines.push(format!(
                "[{}] ({}-{}s) {}",
                seg.id,
                seg.start.floor() as i64,
                seg.end.ceil() as i64,
                seg.text.trim()
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: u32, start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            id,
            text: text.to_string(),
            start,
            end,
            words: Vec::new(),
        }
    }

    #[test]
    fn test_segment_index_lookup() {
        let transcript = Transcript {
            language: "en".to_string(),
            duration: 20.0,
            segments: vec![segment(1, 0.0, 4.5, "hello"), segment(3, 9.0, 12.0, "world")],
        };

        let index = transcript.segment_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&1].text, "hello");
        assert!(!index.contains_key(&2));
    }

    #[test]
    fn test_formatted_floors_and_ceils() {
        let transcript = Transcript {
            language: "en".to_string(),
            duration: 10.0,
            segments: vec![segment(7, 1.4, 3.2, " padded text ")],
        };

        assert_eq!(transcript.formatted(), "[7] (1-4s) padded text");
    }
}
