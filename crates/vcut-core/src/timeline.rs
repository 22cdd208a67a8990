//! Clip timeline resolution.
//!
//! Maps a model suggestion's ordered segment-id list onto transcript
//! timings, producing one time range per run of id-contiguous segments.
//! The suggestion's order is the playback order of the final montage and
//! is never re-sorted chronologically; id adjacency is the only merge
//! criterion, since ids reflect transcript indexing rather than wall-clock
//! proximity.

use std::collections::HashMap;

use tracing::debug;

use vcut_models::{Clip, ClipSuggestion, TimeRange, TranscriptSegment};

use crate::error::{CoreError, CoreResult};

/// Default trailing grace window applied before a hard cut, in seconds.
pub const PADDING_DURATION: f64 = 2.0;

/// A run of id-contiguous segments being merged into one time range.
struct Block {
    start: f64,
    end: f64,
    last_id: u32,
}

/// Resolves clip suggestions into gap-padded time-range sequences.
#[derive(Debug, Clone)]
pub struct TimelineResolver {
    padding: f64,
}

impl Default for TimelineResolver {
    fn default() -> Self {
        Self {
            padding: PADDING_DURATION,
        }
    }
}

impl TimelineResolver {
    /// Create a resolver with a custom padding duration.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] if `padding` is negative or
    /// not finite.
    pub fn new(padding: f64) -> CoreResult<Self> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(CoreError::invalid_config(format!(
                "padding duration must be finite and non-negative, got {padding}"
            )));
        }
        Ok(Self { padding })
    }

    /// Padding duration in seconds.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Resolve one suggestion against the transcript's segment index.
    ///
    /// Unknown ids are dropped silently (the model may hallucinate them).
    /// Returns `None` when no referenced segment exists, which callers
    /// treat as "this suggestion yields no clip", not as an error.
    pub fn resolve(
        &self,
        suggestion: &ClipSuggestion,
        index: &HashMap<u32, &TranscriptSegment>,
    ) -> Option<Clip> {
        let valid: Vec<&TranscriptSegment> = suggestion
            .segment_ids
            .iter()
            .filter_map(|id| index.get(id).copied())
            .collect();

        if valid.len() < suggestion.segment_ids.len() {
            debug!(
                title = %suggestion.title,
                dropped = suggestion.segment_ids.len() - valid.len(),
                "dropped unknown segment ids from suggestion"
            );
        }
        if valid.is_empty() {
            return None;
        }

        let mut blocks = merge_contiguous(&valid);
        self.pad_gaps(&mut blocks);

        let ranges = blocks
            .iter()
            .map(|b| TimeRange::new(b.start, b.end))
            .collect();

        Some(Clip {
            title: suggestion.title.clone(),
            description: suggestion.reasoning.clone(),
            ranges,
            viral_score: suggestion.viral_score,
        })
    }

    /// Resolve a batch of suggestions, silently skipping those that yield
    /// no valid time range.
    pub fn resolve_all(
        &self,
        suggestions: &[ClipSuggestion],
        index: &HashMap<u32, &TranscriptSegment>,
    ) -> Vec<Clip> {
        suggestions
            .iter()
            .filter_map(|s| self.resolve(s, index))
            .collect()
    }

    /// Extend each block except the last by the fixed padding when the gap
    /// to the next block is larger than the padding itself. A small gap
    /// means the two blocks are already close enough that the cut feels
    /// natural; a large gap buys a fixed trailing cushion, it does not
    /// close the gap.
    fn pad_gaps(&self, blocks: &mut [Block]) {
        for i in 0..blocks.len().saturating_sub(1) {
            let gap = blocks[i + 1].start - blocks[i].end;
            if gap > self.padding {
                blocks[i].end += self.padding;
            }
        }
    }
}

/// Walk segments in suggestion order, merging only strict `last_id + 1`
/// successors into the current block.
fn merge_contiguous(segments: &[&TranscriptSegment]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for seg in segments {
        match blocks.last_mut() {
            Some(block) if seg.id == block.last_id + 1 => {
                block.end = seg.end;
                block.last_id = seg.id;
            }
            _ => blocks.push(Block {
                start: seg.start,
                end: seg.end,
                last_id: seg.id,
            }),
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: u32, start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment {
            id,
            text: format!("segment {id}"),
            start,
            end,
            words: Vec::new(),
        }
    }

    fn suggestion(ids: &[u32]) -> ClipSuggestion {
        ClipSuggestion {
            title: "test".to_string(),
            viral_score: 7,
            segment_ids: ids.to_vec(),
            reasoning: "because".to_string(),
        }
    }

    fn index(segments: &[TranscriptSegment]) -> HashMap<u32, &TranscriptSegment> {
        segments.iter().map(|s| (s.id, s)).collect()
    }

    #[test]
    fn test_rejects_invalid_padding() {
        assert!(TimelineResolver::new(-1.0).is_err());
        assert!(TimelineResolver::new(f64::NAN).is_err());
        assert!(TimelineResolver::new(f64::INFINITY).is_err());
        assert!(TimelineResolver::new(0.0).is_ok());
    }

    #[test]
    fn test_contiguous_ids_merge_into_one_range() {
        let segments = vec![
            segment(3, 10.0, 12.0),
            segment(4, 12.1, 14.0),
            segment(5, 14.0, 17.5),
        ];
        let resolver = TimelineResolver::default();
        let clip = resolver
            .resolve(&suggestion(&[3, 4, 5]), &index(&segments))
            .unwrap();

        assert_eq!(clip.ranges, vec![TimeRange::new(10.0, 17.5)]);
        assert_eq!(clip.title, "test");
        assert_eq!(clip.viral_score, 7);
    }

    #[test]
    fn test_montage_order_is_preserved() {
        // [5, 7, 6]: none is the strict successor of the previous id, so
        // each segment is its own block, emitted in suggestion order.
        let segments = vec![
            segment(5, 50.0, 52.0),
            segment(6, 60.0, 62.0),
            segment(7, 70.0, 72.0),
        ];
        let resolver = TimelineResolver::new(0.0).unwrap();
        let clip = resolver
            .resolve(&suggestion(&[5, 7, 6]), &index(&segments))
            .unwrap();

        assert_eq!(
            clip.ranges,
            vec![
                TimeRange::new(50.0, 52.0),
                TimeRange::new(70.0, 72.0),
                TimeRange::new(60.0, 62.0),
            ]
        );
    }

    #[test]
    fn test_gap_above_threshold_gets_fixed_padding() {
        // Gap of 2.5s (> 2.0s): earlier block extended by exactly 2.0s.
        let segments = vec![segment(1, 0.0, 5.0), segment(3, 7.5, 10.0)];
        let resolver = TimelineResolver::default();
        let clip = resolver
            .resolve(&suggestion(&[1, 3]), &index(&segments))
            .unwrap();

        assert_eq!(
            clip.ranges,
            vec![TimeRange::new(0.0, 7.0), TimeRange::new(7.5, 10.0)]
        );
    }

    #[test]
    fn test_gap_below_threshold_is_left_unpadded() {
        // Gap of 1.5s (<= 2.0s): no extension.
        let segments = vec![segment(1, 0.0, 5.0), segment(3, 6.5, 10.0)];
        let resolver = TimelineResolver::default();
        let clip = resolver
            .resolve(&suggestion(&[1, 3]), &index(&segments))
            .unwrap();

        assert_eq!(
            clip.ranges,
            vec![TimeRange::new(0.0, 5.0), TimeRange::new(6.5, 10.0)]
        );
    }

    #[test]
    fn test_last_block_is_never_padded() {
        let segments = vec![segment(1, 0.0, 5.0)];
        let resolver = TimelineResolver::default();
        let clip = resolver
            .resolve(&suggestion(&[1]), &index(&segments))
            .unwrap();

        assert_eq!(clip.ranges, vec![TimeRange::new(0.0, 5.0)]);
    }

    #[test]
    fn test_unknown_ids_are_dropped_silently() {
        let segments = vec![segment(1, 0.0, 2.0), segment(2, 2.0, 4.0)];
        let resolver = TimelineResolver::default();
        let idx = index(&segments);

        let with_hallucination = resolver.resolve(&suggestion(&[1, 999, 2]), &idx).unwrap();
        let without = resolver.resolve(&suggestion(&[1, 2]), &idx).unwrap();

        assert_eq!(with_hallucination.ranges, without.ranges);
        assert_eq!(with_hallucination.ranges, vec![TimeRange::new(0.0, 4.0)]);
    }

    #[test]
    fn test_all_unknown_ids_yield_no_clip() {
        let segments = vec![segment(1, 0.0, 2.0)];
        let resolver = TimelineResolver::default();
        assert!(resolver
            .resolve(&suggestion(&[42, 99]), &index(&segments))
            .is_none());
    }

    #[test]
    fn test_resolve_all_skips_empty_suggestions() {
        let segments = vec![segment(1, 0.0, 2.0)];
        let resolver = TimelineResolver::default();
        let idx = index(&segments);

        let clips = resolver.resolve_all(&[suggestion(&[1]), suggestion(&[999])], &idx);
        assert_eq!(clips.len(), 1);
    }

    #[test]
    fn test_no_merge_across_id_gap_even_if_time_adjacent() {
        // Ids 1 and 3 are not contiguous; their ranges touching in time
        // must not merge them into one block.
        let segments = vec![segment(1, 0.0, 5.0), segment(3, 5.0, 8.0)];
        let resolver = TimelineResolver::new(0.0).unwrap();
        let clip = resolver
            .resolve(&suggestion(&[1, 3]), &index(&segments))
            .unwrap();

        assert_eq!(clip.ranges.len(), 2);
    }

    #[test]
    fn test_repeated_run_can_reopen_a_block() {
        // A montage may revisit an earlier region; the revisit starts a
        // fresh block even though the id was seen before.
        let segments = vec![
            segment(1, 0.0, 2.0),
            segment(2, 2.0, 4.0),
            segment(8, 30.0, 33.0),
        ];
        let resolver = TimelineResolver::new(0.0).unwrap();
        let clip = resolver
            .resolve(&suggestion(&[1, 2, 8, 1]), &index(&segments))
            .unwrap();

        assert_eq!(
            clip.ranges,
            vec![
                TimeRange::new(0.0, 4.0),
                TimeRange::new(30.0, 33.0),
                TimeRange::new(0.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_determinism() {
        let segments = vec![
            segment(1, 0.0, 2.0),
            segment(2, 2.0, 4.0),
            segment(5, 20.0, 25.0),
        ];
        let resolver = TimelineResolver::default();
        let idx = index(&segments);
        let sugg = suggestion(&[5, 1, 2]);

        let first = resolver.resolve(&sugg, &idx).unwrap();
        let second = resolver.resolve(&sugg, &idx).unwrap();
        assert_eq!(first.ranges, second.ranges);
    }
}
