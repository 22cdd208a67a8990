//! Clip suggestions produced by the generative-model boundary.

use serde::{Deserialize, Serialize};

/// A model-proposed montage, expressed as an ordered list of segment ids.
///
/// The id order encodes the intended playback order and may be
/// non-monotonic. Ids are untrusted: the model may reference segments that
/// do not exist, and resolution drops those silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSuggestion {
    /// Proposed clip title
    pub title: String,
    /// Informational virality score
    #[serde(default = "default_viral_score")]
    pub viral_score: i32,
    /// Ordered segment ids (playback order, not time order)
    pub segment_ids: Vec<u32>,
    /// Free-text justification from the model
    #[serde(default)]
    pub reasoning: String,
}

fn default_viral_score() -> i32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"title": "Hot take", "segment_ids": [4, 9, 5]}"#;
        let suggestion: ClipSuggestion = serde_json::from_str(json).unwrap();

        assert_eq!(suggestion.viral_score, 5);
        assert_eq!(suggestion.segment_ids, vec![4, 9, 5]);
        assert!(suggestion.reasoning.is_empty());
    }
}
