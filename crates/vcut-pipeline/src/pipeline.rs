//! End-to-end clip pipeline.
//!
//! Download, transcribe, ask the model for suggestions, resolve them into
//! timelines, then render each clip: cut, reframe to 9:16 along the
//! smoothed camera track, and burn subtitles. Rendering failures are
//! per-clip: one broken clip never sinks the rest of the batch.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use vcut_core::{CameraConfig, CameraSmoother, TimelineResolver};
use vcut_media::{
    burn_subtitles, check_ffmpeg, check_ffprobe, download_video, extract_clip, generate_srt,
    probe_video, reframe_clip, EncodingSettings,
};
use vcut_models::{Clip, ClipSuggestion, Transcript};

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::ports::{ClipAnalyzer, FrameDetector, Notifier, Transcriber};

/// The wired-up pipeline.
pub struct ClipPipeline {
    config: PipelineConfig,
    transcriber: Box<dyn Transcriber>,
    analyzer: Box<dyn ClipAnalyzer>,
    detector: Option<Box<dyn FrameDetector>>,
    notifier: Option<Box<dyn Notifier>>,
    resolver: TimelineResolver,
    smoother: CameraSmoother,
    encoding: EncodingSettings,
}

impl ClipPipeline {
    /// Wire a pipeline from configuration and collaborators.
    ///
    /// # Errors
    /// Rejects invalid timing configuration (negative padding or minimum
    /// shot duration) up front, before any work starts.
    pub fn new(
        config: PipelineConfig,
        transcriber: Box<dyn Transcriber>,
        analyzer: Box<dyn ClipAnalyzer>,
        detector: Option<Box<dyn FrameDetector>>,
        notifier: Option<Box<dyn Notifier>>,
    ) -> PipelineResult<Self> {
        let resolver = TimelineResolver::new(config.padding_duration)?;
        let smoother = CameraSmoother::new(CameraConfig {
            min_shot_duration: config.min_shot_duration,
            ..CameraConfig::default()
        })?;

        Ok(Self {
            config,
            transcriber,
            analyzer,
            detector,
            notifier,
            resolver,
            smoother,
            encoding: EncodingSettings::default(),
        })
    }

    /// Transcribe a media file and resolve the model's suggestions into
    /// renderable clips.
    pub async fn analyze(&self, media: &Path) -> PipelineResult<(Transcript, Vec<Clip>)> {
        let transcript = self
            .transcriber
            .transcribe(media, self.config.language.as_deref())
            .await?;
        info!(
            segments = transcript.segments.len(),
            language = %transcript.language,
            "transcription complete"
        );

        let suggestions = self.analyzer.suggest_clips(&transcript.formatted()).await?;
        let clips = self.resolve_clips(&transcript, &suggestions);
        Ok((transcript, clips))
    }

    /// Resolve suggestions against a transcript, dropping the empty ones.
    fn resolve_clips(&self, transcript: &Transcript, suggestions: &[ClipSuggestion]) -> Vec<Clip> {
        let index = transcript.segment_index();
        let clips = self.resolver.resolve_all(suggestions, &index);
        if clips.len() < suggestions.len() {
            warn!(
                skipped = suggestions.len() - clips.len(),
                "suggestions referenced no known segments and were skipped"
            );
        }
        clips
    }

    /// Process one source URL end to end.
    ///
    /// Returns the paths of the finished clips. Producing zero clips is a
    /// normal outcome (the model found nothing worth cutting), not an
    /// error.
    pub async fn process(&self, url: &str, output_dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        check_ffmpeg()?;
        check_ffprobe()?;
        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        tokio::fs::create_dir_all(output_dir).await?;

        let source = download_video(
            url,
            &self.config.work_dir,
            self.config.cookies_file.as_deref(),
        )
        .await?;

        let source_info = probe_video(&source).await?;
        info!(
            width = source_info.width,
            height = source_info.height,
            duration = source_info.duration,
            "source probed"
        );

        let (transcript, clips) = self.analyze(&source).await?;
        if clips.is_empty() {
            info!(url, "no viable clips for this video");
            self.notify_message(&format!("No viable clips found for {url}"))
                .await;
            return Ok(Vec::new());
        }
        info!(count = clips.len(), "rendering clips");

        let mut finished = Vec::new();
        for clip in &clips {
            match self.render_clip(&source, clip, &transcript, output_dir).await {
                Ok(path) => {
                    info!(path = %path.display(), title = %clip.title, "clip finished");
                    finished.push(path);
                }
                Err(e) => {
                    error!(title = %clip.title, "clip failed: {e}");
                }
            }
        }

        self.notify_message(&format!(
            "Finished {url}: {}/{} clips rendered",
            finished.len(),
            clips.len()
        ))
        .await;
        for path in &finished {
            self.notify_file(path).await;
        }

        Ok(finished)
    }

    /// Render one resolved clip: cut, optionally reframe, optionally burn
    /// subtitles. Returns the final output path.
    async fn render_clip(
        &self,
        source: &Path,
        clip: &Clip,
        transcript: &Transcript,
        output_dir: &Path,
    ) -> PipelineResult<PathBuf> {
        let stem = clip.safe_file_stem();
        let final_path = output_dir.join(format!("{stem}.mp4"));

        let srt = if self.config.subtitles {
            generate_srt(&transcript.segments, &clip.ranges)
        } else {
            String::new()
        };
        let burn = !srt.is_empty();

        // Each stage writes straight to the final path when it is the last
        // one, so nothing needs moving across filesystems afterwards.
        let cut_path = if self.config.reframe || burn {
            self.config.work_dir.join(format!("{stem}.cut.mp4"))
        } else {
            final_path.clone()
        };
        extract_clip(source, &cut_path, clip, &self.encoding).await?;

        let mut current = cut_path;
        if self.config.reframe {
            // Detection runs on the cut clip so the track's frame indices
            // line up with the clip's own timestamps.
            let detections = match &self.detector {
                Some(detector) => match detector.detect_per_frame(&current).await {
                    Ok(detections) => detections,
                    Err(e) => {
                        warn!(title = %clip.title, "detection failed, using center crop: {e}");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };

            let clip_info = probe_video(&current).await?;
            let track = self.smoother.smooth(&detections, clip_info.fps);

            let reframed = if burn {
                self.config.work_dir.join(format!("{stem}.vertical.mp4"))
            } else {
                final_path.clone()
            };
            reframe_clip(&current, &reframed, &track, &clip_info, &self.encoding).await?;
            current = reframed;
        }

        if burn {
            let srt_path = self.config.work_dir.join(format!("{stem}.srt"));
            tokio::fs::write(&srt_path, &srt).await?;
            burn_subtitles(&current, &srt_path, &final_path, &self.encoding).await?;
        }

        Ok(final_path)
    }

    async fn notify_message(&self, text: &str) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.send_message(text).await {
                warn!("notification failed: {e}");
            }
        }
    }

    async fn notify_file(&self, path: &Path) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.send_file(path).await {
                warn!(path = %path.display(), "file delivery failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vcut_models::TranscriptSegment;

    use crate::error::PipelineError;

    struct FakeTranscriber(Transcript);

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(
            &self,
            _media: &Path,
            _language: Option<&str>,
        ) -> PipelineResult<Transcript> {
            Ok(self.0.clone())
        }
    }

    struct FakeAnalyzer(Vec<ClipSuggestion>);

    #[async_trait]
    impl ClipAnalyzer for FakeAnalyzer {
        async fn suggest_clips(&self, _formatted: &str) -> PipelineResult<Vec<ClipSuggestion>> {
            Ok(self.0.clone())
        }
    }

    fn segment(id: u32, start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment {
            id,
            text: format!("segment {id}"),
            start,
            end,
            words: Vec::new(),
        }
    }

    fn transcript() -> Transcript {
        Transcript {
            language: "en".to_string(),
            duration: 100.0,
            segments: vec![
                segment(1, 0.0, 5.0),
                segment(2, 5.0, 10.0),
                segment(3, 40.0, 45.0),
            ],
        }
    }

    fn pipeline(suggestions: Vec<ClipSuggestion>) -> ClipPipeline {
        ClipPipeline::new(
            PipelineConfig::default(),
            Box::new(FakeTranscriber(transcript())),
            Box::new(FakeAnalyzer(suggestions)),
            None,
            None,
        )
        .unwrap()
    }

    fn suggestion(title: &str, ids: Vec<u32>) -> ClipSuggestion {
        ClipSuggestion {
            title: title.to_string(),
            viral_score: 7,
            segment_ids: ids,
            reasoning: "test".to_string(),
        }
    }

    #[test]
    fn test_rejects_negative_padding() {
        let config = PipelineConfig {
            padding_duration: -1.0,
            ..PipelineConfig::default()
        };
        let result = ClipPipeline::new(
            config,
            Box::new(FakeTranscriber(transcript())),
            Box::new(FakeAnalyzer(Vec::new())),
            None,
            None,
        );
        assert!(matches!(result, Err(PipelineError::Core(_))));
    }

    #[tokio::test]
    async fn test_analyze_resolves_suggestions() {
        let pipeline = pipeline(vec![
            suggestion("merged", vec![1, 2]),
            suggestion("montage", vec![3, 1]),
            suggestion("hallucinated", vec![99]),
        ]);

        let (_, clips) = pipeline.analyze(Path::new("unused.mp4")).await.unwrap();
        assert_eq!(clips.len(), 2);

        // id-contiguous 1,2 merge into one range
        assert_eq!(clips[0].ranges.len(), 1);
        assert_eq!(clips[0].ranges[0].start, 0.0);

        // montage order survives: segment 3 plays before segment 1
        assert_eq!(clips[1].ranges.len(), 2);
        assert_eq!(clips[1].ranges[0].start, 40.0);
        assert_eq!(clips[1].ranges[1].start, 0.0);
    }

    #[tokio::test]
    async fn test_analyze_with_no_suggestions() {
        let pipeline = pipeline(Vec::new());
        let (transcript, clips) = pipeline.analyze(Path::new("unused.mp4")).await.unwrap();
        assert_eq!(transcript.segments.len(), 3);
        assert!(clips.is_empty());
    }
}
