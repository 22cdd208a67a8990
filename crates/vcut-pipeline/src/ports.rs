//! Collaborator traits (dependency-injection seams).
//!
//! Every external service the pipeline touches sits behind one of these
//! traits, so the orchestrator can be exercised with fakes and the
//! adapters can be swapped by configuration.

use std::path::Path;

use async_trait::async_trait;

use vcut_models::{ClipSuggestion, FrameDetection, Transcript};

use crate::error::PipelineResult;

/// Speech-to-text boundary.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a media file into ordered, id-stamped segments.
    async fn transcribe(&self, media: &Path, language: Option<&str>) -> PipelineResult<Transcript>;
}

/// Generative-model boundary.
#[async_trait]
pub trait ClipAnalyzer: Send + Sync {
    /// Ask the model for viral clip suggestions over a formatted transcript.
    async fn suggest_clips(&self, formatted_transcript: &str)
        -> PipelineResult<Vec<ClipSuggestion>>;
}

/// Person-detection boundary.
#[async_trait]
pub trait FrameDetector: Send + Sync {
    /// Detect a horizontal center per decoded frame, dense, in frame order.
    async fn detect_per_frame(&self, video: &Path) -> PipelineResult<Vec<FrameDetection>>;
}

/// Delivery boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> PipelineResult<()>;
    async fn send_file(&self, path: &Path) -> PipelineResult<()>;
}
