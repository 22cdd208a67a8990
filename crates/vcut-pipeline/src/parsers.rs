//! Response parsing strategies for the generative model.
//!
//! Different prompt styles produce differently-shaped JSON. Each style has
//! a parser that normalizes its shape into the canonical
//! [`ClipSuggestion`] before anything reaches timeline resolution.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use vcut_models::ClipSuggestion;

use crate::error::{PipelineError, PipelineResult};

/// Prompt style selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Flat clips with a viral score and a `segments_ids` list
    ViralFormula,
    /// Narrative-arc clips (hook/context/story/conclusion id groups)
    NarrativeArc,
}

impl FromStr for PromptStyle {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viral_formula" => Ok(Self::ViralFormula),
            "narrative_arc" => Ok(Self::NarrativeArc),
            other => Err(PipelineError::config_error(format!(
                "unknown prompt style: {other}"
            ))),
        }
    }
}

impl PromptStyle {
    /// The parser matching this style's response shape.
    pub fn parser(&self) -> Box<dyn SuggestionParser> {
        match self {
            Self::ViralFormula => Box::new(ViralFormulaParser),
            Self::NarrativeArc => Box::new(NarrativeArcParser),
        }
    }

    /// JSON-schema block appended to the model prompt.
    pub fn schema_instructions(&self) -> &'static str {
        match self {
            Self::ViralFormula => {
                r#"Return ONLY a JSON array of clip objects with this schema:
[
  {
    "title": "Viral Title",
    "viral_score": 8,
    "segments_ids": [12, 13, 14],
    "reasoning": "Why this clip works"
  }
]
The "segments_ids" are transcript segment ids in the exact playback order
you want them stitched together."#
            }
            Self::NarrativeArc => {
                r#"Return ONLY a JSON array of clip objects with this schema:
[
  {
    "title": "Viral Title",
    "narrative_arc": {
      "hook_ids": [44],
      "context_ids": [12, 13],
      "story_ids": [30, 31, 32],
      "conclusion_ids": [45]
    },
    "final_clip_sequence": [44, 12, 13, 30, 31, 32, 45],
    "reasoning": "Why this clip works"
  }
]
"final_clip_sequence" lists transcript segment ids in the exact playback
order of the montage."#
            }
        }
    }
}

/// Parses one prompt style's response shape into canonical suggestions.
pub trait SuggestionParser: Send + Sync {
    /// Parse a single clip object.
    fn parse_one(&self, value: &Value) -> PipelineResult<ClipSuggestion>;

    /// Parse a full response: either an array of clips or a single object.
    fn parse_response(&self, value: &Value) -> PipelineResult<Vec<ClipSuggestion>> {
        match value {
            Value::Array(items) => items.iter().map(|v| self.parse_one(v)).collect(),
            _ => Ok(vec![self.parse_one(value)?]),
        }
    }
}

/// Parser for the viral-formula prompt output.
pub struct ViralFormulaParser;

#[derive(Debug, Deserialize)]
struct ViralFormulaClip {
    #[serde(default = "untitled")]
    title: String,
    #[serde(default = "default_score")]
    viral_score: i32,
    // The prompt asks for "segments_ids"; tolerate the singular form too
    #[serde(alias = "segment_ids", default)]
    segments_ids: Vec<u32>,
    #[serde(default)]
    reasoning: String,
}

impl SuggestionParser for ViralFormulaParser {
    fn parse_one(&self, value: &Value) -> PipelineResult<ClipSuggestion> {
        let clip: ViralFormulaClip = serde_json::from_value(value.clone())?;
        Ok(ClipSuggestion {
            title: clip.title,
            viral_score: clip.viral_score,
            segment_ids: clip.segments_ids,
            reasoning: clip.reasoning,
        })
    }
}

/// Parser for the narrative-arc prompt output.
pub struct NarrativeArcParser;

#[derive(Debug, Deserialize)]
struct NarrativeArcClip {
    #[serde(default = "untitled")]
    title: String,
    #[serde(default)]
    narrative_arc: NarrativeArc,
    #[serde(default)]
    final_clip_sequence: Option<Vec<u32>>,
    #[serde(default)]
    reasoning: String,
}

#[derive(Debug, Default, Deserialize)]
struct NarrativeArc {
    #[serde(default)]
    hook_ids: Vec<u32>,
    #[serde(default)]
    context_ids: Vec<u32>,
    #[serde(default)]
    story_ids: Vec<u32>,
    #[serde(default)]
    conclusion_ids: Vec<u32>,
}

impl NarrativeArc {
    /// All arc ids in narrative order.
    fn sequence(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        ids.extend(&self.hook_ids);
        ids.extend(&self.context_ids);
        ids.extend(&self.story_ids);
        ids.extend(&self.conclusion_ids);
        ids
    }
}

impl SuggestionParser for NarrativeArcParser {
    fn parse_one(&self, value: &Value) -> PipelineResult<ClipSuggestion> {
        let clip: NarrativeArcClip = serde_json::from_value(value.clone())?;
        let segment_ids = match clip.final_clip_sequence {
            Some(sequence) if !sequence.is_empty() => sequence,
            _ => clip.narrative_arc.sequence(),
        };
        Ok(ClipSuggestion {
            title: clip.title,
            // This response shape carries no score
            viral_score: default_score(),
            segment_ids,
            reasoning: clip.reasoning,
        })
    }
}

fn untitled() -> String {
    "Untitled".to_string()
}

fn default_score() -> i32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viral_formula_array() {
        let value: Value = serde_json::from_str(
            r#"[
                {"title": "A", "viral_score": 9, "segments_ids": [4, 9, 5], "reasoning": "hook"},
                {"title": "B", "segment_ids": [1, 2]}
            ]"#,
        )
        .unwrap();

        let suggestions = ViralFormulaParser.parse_response(&value).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].segment_ids, vec![4, 9, 5]);
        assert_eq!(suggestions[0].viral_score, 9);
        assert_eq!(suggestions[1].title, "B");
        assert_eq!(suggestions[1].viral_score, 5);
        assert_eq!(suggestions[1].segment_ids, vec![1, 2]);
    }

    #[test]
    fn test_viral_formula_single_object() {
        let value: Value =
            serde_json::from_str(r#"{"title": "Solo", "segments_ids": [7]}"#).unwrap();
        let suggestions = ViralFormulaParser.parse_response(&value).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].segment_ids, vec![7]);
    }

    #[test]
    fn test_narrative_arc_prefers_final_sequence() {
        let value: Value = serde_json::from_str(
            r#"{
                "title": "Arc",
                "narrative_arc": {"hook_ids": [1], "story_ids": [2, 3]},
                "final_clip_sequence": [3, 1, 2],
                "reasoning": "montage"
            }"#,
        )
        .unwrap();

        let suggestion = NarrativeArcParser.parse_one(&value).unwrap();
        assert_eq!(suggestion.segment_ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_narrative_arc_falls_back_to_arc_order() {
        let value: Value = serde_json::from_str(
            r#"{
                "title": "Arc",
                "narrative_arc": {
                    "hook_ids": [44],
                    "context_ids": [12],
                    "story_ids": [30, 31],
                    "conclusion_ids": [45]
                }
            }"#,
        )
        .unwrap();

        let suggestion = NarrativeArcParser.parse_one(&value).unwrap();
        assert_eq!(suggestion.segment_ids, vec![44, 12, 30, 31, 45]);
    }

    #[test]
    fn test_prompt_style_from_str() {
        assert_eq!(
            "viral_formula".parse::<PromptStyle>().unwrap(),
            PromptStyle::ViralFormula
        );
        assert_eq!(
            "narrative_arc".parse::<PromptStyle>().unwrap(),
            PromptStyle::NarrativeArc
        );
        assert!("gibberish".parse::<PromptStyle>().is_err());
    }
}
