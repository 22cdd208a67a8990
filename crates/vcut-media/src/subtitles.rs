//! SRT generation and subtitle burning.

use std::fmt::Write as _;
use std::path::Path;

use vcut_models::{format_srt_timestamp, TimeRange, TranscriptSegment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::cut::EncodingSettings;
use crate::error::MediaResult;

/// Minimum on-screen duration worth emitting, in seconds.
const MIN_CUE_DURATION: f64 = 0.2;

/// Generate SRT subtitles for a cut clip.
///
/// `ranges` is the clip's time-range list in playback order. Transcript
/// segments are intersected with each range and remapped into output-clip
/// time: the clip is the ranges concatenated back to back, so each range
/// contributes its duration to the running offset.
pub fn generate_srt(segments: &[TranscriptSegment], ranges: &[TimeRange]) -> String {
    let mut srt = String::new();
    let mut cue = 1u32;
    let mut offset = 0.0;

    for range in ranges {
        for seg in segments {
            let start = seg.start.max(range.start);
            let end = seg.end.min(range.end);
            if end - start < MIN_CUE_DURATION {
                continue;
            }

            let text = seg.text.trim();
            if text.is_empty() {
                continue;
            }

            let out_start = offset + (start - range.start);
            let out_end = offset + (end - range.start);
            let _ = write!(
                srt,
                "{cue}\n{} --> {}\n{text}\n\n",
                format_srt_timestamp(out_start),
                format_srt_timestamp(out_end),
            );
            cue += 1;
        }
        offset += range.duration();
    }

    srt
}

/// Burn an SRT file into a video.
pub async fn burn_subtitles(
    input: impl AsRef<Path>,
    subtitles: impl AsRef<Path>,
    output: impl AsRef<Path>,
    encoding: &EncodingSettings,
) -> MediaResult<()> {
    // Single quotes guard the path against filter-option splitting
    let filter = format!(
        "subtitles='{}'",
        subtitles.as_ref().display().to_string().replace('\'', "\\'")
    );

    let cmd = FfmpegCommand::new(input.as_ref(), output.as_ref())
        .video_filter(filter)
        .video_codec(&encoding.video_codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec("copy");

    FfmpegRunner::new().run(&cmd).await
}
