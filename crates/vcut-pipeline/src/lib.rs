//! Pipeline orchestration for ViralCut.
//!
//! Wires the external collaborators (downloader, transcriber, generative
//! analyzer, frame detector, notifier) around the core timeline resolution
//! and camera smoothing, one video at a time. All collaborators are
//! injected through the [`ports`] traits; the binary in `main.rs` does the
//! wiring from environment configuration.

pub mod config;
pub mod detector;
pub mod error;
pub mod gemini;
pub mod parsers;
pub mod pipeline;
pub mod ports;
pub mod telegram;
pub mod transcriber;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::ClipPipeline;
