//! Source video download via yt-dlp.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};

/// Format selection: prefer an mp4 video+audio pair, fall back to best.
const FORMAT_SELECTOR: &str = "bv*[ext=mp4]+ba[ext=m4a]/b[ext=mp4]/b";

/// Download a video into `output_dir`, returning the downloaded file path.
///
/// An optional Netscape-format cookies file is forwarded to yt-dlp for
/// sources that require authentication.
pub async fn download_video(
    url: &str,
    output_dir: impl AsRef<Path>,
    cookies: Option<&Path>,
) -> MediaResult<PathBuf> {
    check_ytdlp()?;
    let output_dir = output_dir.as_ref();
    tokio::fs::create_dir_all(output_dir).await?;

    let template = output_dir.join("%(id)s.%(ext)s");
    let mut args: Vec<String> = vec![
        "--no-playlist".to_string(),
        "--no-simulate".to_string(),
        "--print".to_string(),
        "after_move:filepath".to_string(),
        "-f".to_string(),
        FORMAT_SELECTOR.to_string(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
    ];
    if let Some(cookies) = cookies {
        args.push("--cookies".to_string());
        args.push(cookies.to_string_lossy().into_owned());
    }
    args.push(url.to_string());

    info!(url, dir = %output_dir.display(), "downloading source video");

    let output = Command::new("yt-dlp")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| l.starts_with("ERROR")) {
            warn!("yt-dlp: {line}");
        }
        return Err(MediaError::download_failed(format!(
            "yt-dlp exited with {:?}: {}",
            output.status.code(),
            stderr.lines().last().unwrap_or("no output")
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .next_back()
        .map(PathBuf::from)
        .ok_or_else(|| MediaError::download_failed("yt-dlp did not report a file path"))?;

    if !path.exists() {
        return Err(MediaError::download_failed(format!(
            "reported file does not exist: {}",
            path.display()
        )));
    }

    info!(path = %path.display(), "download complete");
    Ok(path)
}
