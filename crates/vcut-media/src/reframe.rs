//! 9:16 reframing driven by a camera track.
//!
//! Implements the renderer side of the camera-track contract: the crop
//! window has a fixed width (the largest even integer that fits a 9:16
//! portrait inside the source height), and its horizontal position follows
//! the smoothed track. Position changes are collapsed into constant-x runs
//! and fed to FFmpeg through a `sendcmd` script driving a named `crop`
//! filter, so a whole clip renders in a single pass.

use std::path::Path;
use tracing::info;

use vcut_models::CameraTrack;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::cut::EncodingSettings;
use crate::error::MediaResult;
use crate::probe::VideoInfo;

/// Output portrait dimensions.
const OUTPUT_WIDTH: u32 = 1080;
const OUTPUT_HEIGHT: u32 = 1920;

/// One constant-x run of the crop window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropKeyframe {
    /// Time of the first frame of the run, in seconds
    pub time: f64,
    /// Left edge of the crop window, in source pixels
    pub x: u32,
}

/// A renderable crop plan for one clip.
#[derive(Debug, Clone)]
pub struct CropPlan {
    /// Crop window width in source pixels
    pub width: u32,
    /// Constant-x runs in time order; never empty
    pub keyframes: Vec<CropKeyframe>,
}

/// Largest even crop width that keeps a 9:16 aspect within `source_height`.
pub fn portrait_crop_width(source_height: u32) -> u32 {
    let width = (f64::from(source_height) * 9.0 / 16.0) as u32;
    width & !1
}

/// Build a crop plan from a smoothed camera track.
///
/// Returns `None` for an empty track, which callers turn into a static
/// center crop. Each track entry maps to the timestamp of its frame; runs
/// of identical positions collapse into a single keyframe.
pub fn build_crop_plan(
    track: &CameraTrack,
    fps: f64,
    source_width: u32,
    source_height: u32,
) -> Option<CropPlan> {
    if track.is_empty() || fps <= 0.0 {
        return None;
    }

    let width = portrait_crop_width(source_height);
    let max_x = source_width.saturating_sub(width);

    let mut keyframes: Vec<CropKeyframe> = Vec::new();
    for (frame, &center) in track.iter().enumerate() {
        let x = clamp_left_edge(center, width, max_x);
        if keyframes.last().map(|k| k.x) != Some(x) {
            keyframes.push(CropKeyframe {
                time: frame as f64 / fps,
                x,
            });
        }
    }

    Some(CropPlan { width, keyframes })
}

/// Left edge for a crop window centered on `center`, clamped to the frame.
fn clamp_left_edge(center: i32, width: u32, max_x: u32) -> u32 {
    let left = center - (width / 2) as i32;
    left.clamp(0, max_x as i32) as u32
}

/// Build the sendcmd script that repositions the crop window over time.
fn build_sendcmd_script(plan: &CropPlan) -> String {
    plan.keyframes
        .iter()
        .map(|k| format!("{:.3} [enter] crop@seat x {};", k.time, k.x))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reframe a landscape clip to 9:16 portrait.
///
/// An empty camera track falls back to a static center crop; this is the
/// normal outcome for clips where no person was ever detected.
pub async fn reframe_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    track: &CameraTrack,
    info: &VideoInfo,
    encoding: &EncodingSettings,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let plan = build_crop_plan(track, info.fps, info.width, info.height);

    // The sendcmd script must outlive the ffmpeg run
    let _script_file;
    let filter = match &plan {
        Some(plan) => {
            info!(
                keyframes = plan.keyframes.len(),
                crop_width = plan.width,
                "reframing with camera track"
            );
            let script = build_sendcmd_script(plan);
            let file = tempfile::Builder::new().suffix(".cmd").tempfile()?;
            tokio::fs::write(file.path(), script).await?;
            let filter = format!(
                "sendcmd=f='{script_path}',\
                 crop@seat=w={w}:h={h}:x={x0}:y=0:exact=1,\
                 scale={ow}:{oh}:flags=lanczos,setsar=1",
                script_path = file.path().display(),
                w = plan.width,
                h = info.height,
                x0 = plan.keyframes[0].x,
                ow = OUTPUT_WIDTH,
                oh = OUTPUT_HEIGHT,
            );
            _script_file = Some(file);
            filter
        }
        None => {
            info!("no camera track, using static center crop");
            let width = portrait_crop_width(info.height);
            let x = (info.width.saturating_sub(width)) / 2;
            _script_file = None;
            format!(
                "crop=w={width}:h={h}:x={x}:y=0,scale={ow}:{oh}:flags=lanczos,setsar=1",
                h = info.height,
                ow = OUTPUT_WIDTH,
                oh = OUTPUT_HEIGHT,
            )
        }
    };

    let cmd = FfmpegCommand::new(input, output)
        .video_filter(filter)
        .video_codec(&encoding.video_codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec("copy");

    FfmpegRunner::new().run(&cmd).await
}
