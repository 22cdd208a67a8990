//! Shared data models for the ViralCut pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Transcripts and transcript segments
//! - Model-suggested clips and resolved clip timelines
//! - Per-frame detections and camera tracks
//! - Timestamp parsing and formatting

pub mod clip;
pub mod detection;
pub mod suggestion;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use clip::{Clip, TimeRange};
pub use detection::{CameraTrack, FrameDetection};
pub use suggestion::ClipSuggestion;
pub use timestamp::{format_srt_timestamp, format_timestamp, parse_timestamp, TimestampError};
pub use transcript::{Transcript, TranscriptSegment, Word};
