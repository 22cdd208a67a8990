//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("AI analysis failed: {0}")]
    AiFailed(String),

    #[error("Frame detection failed: {0}")]
    DetectionFailed(String),

    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    #[error("Core error: {0}")]
    Core(#[from] vcut_core::CoreError),

    #[error("Media error: {0}")]
    Media(#[from] vcut_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn transcription_failed(msg: impl Into<String>) -> Self {
        Self::TranscriptionFailed(msg.into())
    }

    pub fn ai_failed(msg: impl Into<String>) -> Self {
        Self::AiFailed(msg.into())
    }

    pub fn detection_failed(msg: impl Into<String>) -> Self {
        Self::DetectionFailed(msg.into())
    }

    pub fn notify_failed(msg: impl Into<String>) -> Self {
        Self::NotifyFailed(msg.into())
    }
}
