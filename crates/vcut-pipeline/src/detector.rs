//! External per-frame person detector adapter.
//!
//! Runs a user-configured command with the video path appended and expects
//! a JSON array on stdout, one entry per decoded frame: the horizontal
//! pixel center of the main subject, or `null` where nothing was detected.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use vcut_models::FrameDetection;

use crate::error::{PipelineError, PipelineResult};
use crate::ports::FrameDetector;

/// Frame detector that shells out to an external command.
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
}

impl CommandDetector {
    /// Build from a whitespace-separated command string, e.g.
    /// `"python3 detect_faces.py --stride 1"`.
    pub fn new(command: &str) -> PipelineResult<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| PipelineError::config_error("detector command is empty"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl FrameDetector for CommandDetector {
    async fn detect_per_frame(&self, video: &Path) -> PipelineResult<Vec<FrameDetection>> {
        info!(program = %self.program, video = %video.display(), "running frame detector");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(video)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::detection_failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let detections = parse_detections(&stdout)?;
        debug!(frames = detections.len(), "detector output parsed");
        Ok(detections)
    }
}

/// Parse the detector's stdout: a JSON array of nullable integers.
fn parse_detections(stdout: &str) -> PipelineResult<Vec<FrameDetection>> {
    serde_json::from_str(stdout.trim())
        .map_err(|e| PipelineError::detection_failed(format!("bad detector output: {e}")))
}
