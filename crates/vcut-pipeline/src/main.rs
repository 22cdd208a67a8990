//! ViralCut CLI binary.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vcut_pipeline::detector::CommandDetector;
use vcut_pipeline::gemini::GeminiClient;
use vcut_pipeline::ports::{FrameDetector, Notifier};
use vcut_pipeline::telegram::TelegramNotifier;
use vcut_pipeline::transcriber::WhisperCliTranscriber;
use vcut_pipeline::{ClipPipeline, PipelineConfig, PipelineError};

/// Turn a long-form video into short vertical clips.
#[derive(Debug, Parser)]
#[command(name = "vcut", version, about)]
struct Cli {
    /// Source video URL (anything yt-dlp can fetch)
    url: String,

    /// Directory for the finished clips
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Keep the clips landscape (skip the 9:16 reframe)
    #[arg(long)]
    skip_reframe: bool,

    /// Do not burn subtitles into the clips
    #[arg(long)]
    skip_subtitles: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = PipelineConfig::from_env();
    config.reframe = !cli.skip_reframe;
    config.subtitles = !cli.skip_subtitles;

    let pipeline = match build_pipeline(config) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to build pipeline: {e}");
            std::process::exit(1);
        }
    };

    match pipeline.process(&cli.url, &cli.output).await {
        Ok(paths) => {
            info!(clips = paths.len(), "done");
            for path in paths {
                println!("{}", path.display());
            }
        }
        Err(e) => {
            error!("Pipeline failed: {e}");
            std::process::exit(1);
        }
    }
}

fn build_pipeline(config: PipelineConfig) -> Result<ClipPipeline, PipelineError> {
    let transcriber = WhisperCliTranscriber::new(&config.whisper_bin, &config.whisper_model);
    let analyzer = GeminiClient::from_env(config.prompt_style)?;

    let detector: Option<Box<dyn FrameDetector>> = match &config.detector_command {
        Some(command) => Some(Box::new(CommandDetector::new(command)?)),
        None => None,
    };
    let notifier: Option<Box<dyn Notifier>> =
        TelegramNotifier::from_env().map(|n| Box::new(n) as Box<dyn Notifier>);

    ClipPipeline::new(
        config,
        Box::new(transcriber),
        Box::new(analyzer),
        detector,
        notifier,
    )
}

/// Initialize tracing: colored output for dev, JSON when LOG_FORMAT=json.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vcut=debug"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
