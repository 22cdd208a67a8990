//! Resolved clip timeline models.

use serde::{Deserialize, Serialize};

/// A half-open span of source time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (always > start)
    pub end: f64,
}

impl TimeRange {
    /// Create a new time range.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A resolved clip: an ordered list of source time ranges to trim and
/// concatenate, in array order (playback order, not time order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Clip title (from the suggestion)
    pub title: String,
    /// Description / social caption (the suggestion's reasoning)
    pub description: String,
    /// Ordered source ranges; playback order = array order
    pub ranges: Vec<TimeRange>,
    /// Informational virality score carried from the suggestion
    pub viral_score: i32,
}

impl Clip {
    /// Total output duration of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.ranges.iter().map(TimeRange::duration).sum()
    }

    /// A filesystem-safe file stem derived from the title.
    pub fn safe_file_stem(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        if stem.is_empty() {
            "clip".to_string()
        } else {
            stem
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_duration_sums_ranges() {
        let clip = Clip {
            title: "t".to_string(),
            description: String::new(),
            ranges: vec![TimeRange::new(10.0, 15.0), TimeRange::new(2.0, 4.5)],
            viral_score: 8,
        };
        assert!((clip.duration() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_safe_file_stem() {
        let clip = Clip {
            title: "Why AI won't replace you!".to_string(),
            description: String::new(),
            ranges: Vec::new(),
            viral_score: 0,
        };
        assert_eq!(clip.safe_file_stem(), "Why_AI_won_t_replace_you_");
    }
}
