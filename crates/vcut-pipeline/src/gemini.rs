//! Gemini client for clip suggestion.
//!
//! Sends the formatted transcript to Google's Gemini API in JSON mode and
//! normalizes the response through the configured parsing strategy.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use vcut_models::ClipSuggestion;

use crate::error::{PipelineError, PipelineResult};
use crate::parsers::{PromptStyle, SuggestionParser};
use crate::ports::ClipAnalyzer;

/// Models tried in order until one answers.
const FALLBACK_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-pro",
];

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    style: PromptStyle,
    parser: Box<dyn SuggestionParser>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

impl GeminiClient {
    /// Create a client reading `GEMINI_API_KEY` from the environment.
    pub fn from_env(style: PromptStyle) -> PipelineResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| PipelineError::config_error("GEMINI_API_KEY not set"))?;
        Ok(Self::new(api_key, style))
    }

    /// Create a client with an explicit key.
    pub fn new(api_key: impl Into<String>, style: PromptStyle) -> Self {
        Self {
            api_key: api_key.into(),
            style,
            parser: style.parser(),
            client: Client::new(),
        }
    }

    /// Build the full prompt for a formatted transcript.
    fn build_prompt(&self, formatted_transcript: &str) -> String {
        format!(
            r#"You are a short-form video editor. From the transcript below,
pick 3 to 10 viral-worthy clips of 20-90 seconds each. Reference segments
by the integer id in square brackets; ids you list are stitched together
in the order you give them, so a deliberate montage order is allowed.

{schema}

Additional instructions:
- Return ONLY the JSON described above and nothing else.
- Only use segment ids that appear in the transcript.

TRANSCRIPT:
{formatted_transcript}
"#,
            schema = self.style.schema_instructions(),
        )
    }

    /// Call one Gemini model.
    async fn call_model(&self, model: &str, prompt: &str) -> PipelineResult<Vec<ClipSuggestion>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::ai_failed(format!("Gemini request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ai_failed(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        let gemini: GeminiResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ai_failed(format!("malformed Gemini response: {e}")))?;

        let text = gemini
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| PipelineError::ai_failed("no content in Gemini response"))?;

        let value: Value = serde_json::from_str(strip_code_fences(text))
            .map_err(|e| PipelineError::ai_failed(format!("suggestion JSON did not parse: {e}")))?;

        self.parser.parse_response(&value)
    }
}

#[async_trait]
impl ClipAnalyzer for GeminiClient {
    async fn suggest_clips(
        &self,
        formatted_transcript: &str,
    ) -> PipelineResult<Vec<ClipSuggestion>> {
        let prompt = self.build_prompt(formatted_transcript);
        let mut last_error = None;

        for model in FALLBACK_MODELS {
            info!(model, "querying Gemini for clip suggestions");
            match self.call_model(model, &prompt).await {
                Ok(suggestions) => {
                    info!(model, count = suggestions.len(), "got clip suggestions");
                    return Ok(suggestions);
                }
                Err(e) => {
                    warn!(model, "model failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PipelineError::ai_failed("all Gemini models failed")))
    }
}

/// Strip a markdown code fence the model sometimes wraps JSON in.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("[1, 2]"), "[1, 2]");
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_prompt_includes_transcript_and_schema() {
        let client = GeminiClient::new("test-key", PromptStyle::ViralFormula);
        let prompt = client.build_prompt("[1] (0-4s) hello world");

        assert!(prompt.contains("[1] (0-4s) hello world"));
        assert!(prompt.contains("segments_ids"));
    }
}
