//! Pipeline configuration from environment variables.

use std::path::PathBuf;

use crate::parsers::PromptStyle;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Work directory for downloads and intermediate files
    pub work_dir: PathBuf,
    /// Whisper-compatible transcriber binary
    pub whisper_bin: String,
    /// Transcription model name
    pub whisper_model: String,
    /// Optional forced transcription language
    pub language: Option<String>,
    /// Prompt style / response shape for the generative model
    pub prompt_style: PromptStyle,
    /// Trailing grace window for timeline gaps, in seconds
    pub padding_duration: f64,
    /// Minimum shot duration before a camera-seat switch, in seconds
    pub min_shot_duration: f64,
    /// External per-frame detector command, if any
    pub detector_command: Option<String>,
    /// Optional Netscape cookies file for yt-dlp
    pub cookies_file: Option<PathBuf>,
    /// Reframe cut clips to 9:16
    pub reframe: bool,
    /// Burn subtitles into reframed clips
    pub subtitles: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/vcut"),
            whisper_bin: "whisperx".to_string(),
            whisper_model: "large-v3-turbo".to_string(),
            language: None,
            prompt_style: PromptStyle::ViralFormula,
            padding_duration: vcut_core::PADDING_DURATION,
            min_shot_duration: vcut_core::camera::MIN_SHOT_DURATION,
            detector_command: None,
            cookies_file: None,
            reframe: true,
            subtitles: true,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("VCUT_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            whisper_bin: std::env::var("VCUT_WHISPER_BIN").unwrap_or(defaults.whisper_bin),
            whisper_model: std::env::var("VCUT_WHISPER_MODEL").unwrap_or(defaults.whisper_model),
            language: std::env::var("VCUT_LANGUAGE").ok(),
            prompt_style: std::env::var("VCUT_PROMPT_STYLE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.prompt_style),
            padding_duration: std::env::var("VCUT_PADDING_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.padding_duration),
            min_shot_duration: std::env::var("VCUT_MIN_SHOT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_shot_duration),
            detector_command: std::env::var("VCUT_DETECTOR_CMD").ok(),
            cookies_file: std::env::var("VCUT_COOKIES_FILE").ok().map(PathBuf::from),
            reframe: defaults.reframe,
            subtitles: defaults.subtitles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.padding_duration, 2.0);
        assert_eq!(config.min_shot_duration, 2.0);
        assert_eq!(config.prompt_style, PromptStyle::ViralFormula);
        assert!(config.reframe);
    }
}
