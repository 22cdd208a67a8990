//! WhisperX CLI transcriber adapter.
//!
//! Shells out to a whisperx-compatible binary, asks for JSON output in a
//! temporary directory, and normalizes the result into [`Transcript`] with
//! sequential segment ids.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use vcut_models::{Transcript, TranscriptSegment, Word};

use crate::error::{PipelineError, PipelineResult};
use crate::ports::Transcriber;

/// Transcriber backed by the whisperx command-line tool.
pub struct WhisperCliTranscriber {
    binary: String,
    model: String,
}

impl WhisperCliTranscriber {
    pub fn new(binary: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, media: &Path, language: Option<&str>) -> PipelineResult<Transcript> {
        let output_dir = TempDir::new()?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(media)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(output_dir.path());
        if let Some(lang) = language {
            cmd.arg("--language").arg(lang);
        }

        info!(binary = %self.binary, model = %self.model, "transcribing");
        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::transcription_failed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        // whisperx writes <media stem>.json into the output directory
        let stem = media
            .file_stem()
            .ok_or_else(|| PipelineError::transcription_failed("media path has no file stem"))?;
        let json_path = output_dir.path().join(stem).with_extension("json");
        let raw = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            PipelineError::transcription_failed(format!(
                "missing transcription output {}: {e}",
                json_path.display()
            ))
        })?;

        let transcript = parse_whisper_json(&raw)?;
        debug!(
            segments = transcript.segments.len(),
            duration = transcript.duration,
            "transcription parsed"
        );
        Ok(transcript)
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default = "default_language")]
    language: String,
    segments: Vec<WhisperSegment>,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    words: Vec<WhisperWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperWord {
    word: String,
    // Words without alignment carry no timing; they are skipped
    start: Option<f64>,
    end: Option<f64>,
    #[serde(default = "default_word_score")]
    score: f64,
}

fn default_word_score() -> f64 {
    1.0
}

/// Parse whisperx JSON output, stamping sequential segment ids.
fn parse_whisper_json(raw: &str) -> PipelineResult<Transcript> {
    let output: WhisperOutput = serde_json::from_str(raw)?;

    let segments: Vec<TranscriptSegment> = output
        .segments
        .into_iter()
        .enumerate()
        .map(|(i, seg)| TranscriptSegment {
            id: i as u32 + 1,
            text: seg.text.trim().to_string(),
            start: seg.start,
            end: seg.end,
            words: seg
                .words
                .into_iter()
                .filter_map(|w| {
                    Some(Word {
                        text: w.word,
                        start: w.start?,
                        end: w.end?,
                        confidence: w.score,
                    })
                })
                .collect(),
        })
        .collect();

    let duration = segments.last().map(|s| s.end).unwrap_or(0.0);
    Ok(Transcript {
        language: output.language,
        duration,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whisper_json() {
        let raw = r#"{
            "language": "en",
            "segments": [
                {
                    "start": 0.5, "end": 4.2, "text": " hello there ",
                    "words": [
                        {"word": "hello", "start": 0.5, "end": 1.0, "score": 0.98},
                        {"word": "there", "start": 1.1, "end": 1.6}
                    ]
                },
                {"start": 5.0, "end": 9.7, "text": "second segment"}
            ]
        }"#;

        let transcript = parse_whisper_json(raw).unwrap();
        assert_eq!(transcript.language, "en");
        assert_eq!(transcript.duration, 9.7);
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].id, 1);
        assert_eq!(transcript.segments[0].text, "hello there");
        assert_eq!(transcript.segments[0].words.len(), 2);
        assert_eq!(transcript.segments[0].words[1].confidence, 1.0);
        assert_eq!(transcript.segments[1].id, 2);
    }

    #[test]
    fn test_parse_skips_unaligned_words() {
        let raw = r#"{
            "segments": [
                {
                    "start": 0.0, "end": 2.0, "text": "uh huh",
                    "words": [
                        {"word": "uh", "start": 0.0, "end": 0.4},
                        {"word": "huh", "start": null, "end": null}
                    ]
                }
            ]
        }"#;

        let transcript = parse_whisper_json(raw).unwrap();
        assert_eq!(transcript.segments[0].words.len(), 1);
        assert_eq!(transcript.language, "en");
    }

    #[test]
    fn test_parse_empty_segments() {
        let transcript = parse_whisper_json(r#"{"language": "de", "segments": []}"#).unwrap();
        assert!(transcript.segments.is_empty());
        assert_eq!(transcript.duration, 0.0);
    }
}
