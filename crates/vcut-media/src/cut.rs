//! Clip cutting: trim each time range and concatenate in playback order.

use std::path::Path;
use tracing::info;

use vcut_models::Clip;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Encoding settings for cut and reframe renders.
#[derive(Debug, Clone)]
pub struct EncodingSettings {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
        }
    }
}

/// Cut a clip out of the source video.
///
/// Each range is trimmed from the source and the pieces are concatenated
/// in array order. Array order is playback order: montage-style clips may
/// jump backwards in source time, and that order must survive the render.
pub async fn extract_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    clip: &Clip,
    encoding: &EncodingSettings,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if clip.ranges.is_empty() {
        return Err(MediaError::EmptyClip);
    }

    info!(
        title = %clip.title,
        ranges = clip.ranges.len(),
        duration = clip.duration(),
        "cutting clip"
    );

    let cmd = FfmpegCommand::new(input, output)
        .filter_complex(build_concat_filter(clip))
        .map_stream("[outv]")
        .map_stream("[outa]")
        .video_codec(&encoding.video_codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec);

    FfmpegRunner::new().run(&cmd).await
}

/// Build the trim/atrim + concat filter graph for a clip.
fn build_concat_filter(clip: &Clip) -> String {
    let mut filter = String::new();
    let mut labels = String::new();

    for (i, range) in clip.ranges.iter().enumerate() {
        filter.push_str(&format!(
            "[0:v]trim=start={start:.3}:end={end:.3},setpts=PTS-STARTPTS[v{i}];\
             [0:a]atrim=start={start:.3}:end={end:.3},asetpts=PTS-STARTPTS[a{i}];",
            start = range.start,
            end = range.end,
        ));
        labels.push_str(&format!("[v{i}][a{i}]"));
    }

    filter.push_str(&format!(
        "{labels}concat=n={}:v=1:a=1[outv][outa]",
        clip.ranges.len()
    ));
    filter
}
