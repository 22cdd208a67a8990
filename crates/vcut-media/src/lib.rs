//! FFmpeg/yt-dlp CLI wrappers for the ViralCut pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with progress parsing
//! - FFprobe video inspection
//! - Source download via yt-dlp
//! - Clip cutting (trim + concat in playback order)
//! - 9:16 reframing driven by a camera track
//! - SRT generation and subtitle burning

pub mod command;
pub mod cut;
pub mod download;
pub mod error;
pub mod probe;
pub mod progress;
pub mod reframe;
pub mod subtitles;

pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use cut::{extract_clip, EncodingSettings};
pub use download::download_video;
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use progress::FfmpegProgress;
pub use reframe::{build_crop_plan, portrait_crop_width, reframe_clip, CropPlan};
pub use subtitles::{burn_subtitles, generate_srt};
