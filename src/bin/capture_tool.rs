//! 双摄像头手语片段采集

use clap::Parser;
use hand_sign_data::capture::{spawn_recorder, ClipRecorder, FfmpegBackend};
use hand_sign_data::config::PipelineConfig;
use hand_sign_data::core::video::check_ffmpeg;
use hand_sign_data::gui::{self, CaptureApp};
use hand_sign_data::init_logging;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "capture_tool", about = "Record hand-sign clips from two cameras", version)]
struct Args {
    /// JSON file overriding the default settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();
    let config = PipelineConfig::load_or_default(args.config.as_deref())?;

    info!("✅ {}", check_ffmpeg(&config.ffmpeg)?);

    let recorder = ClipRecorder::new(
        FfmpegBackend::new(config.ffmpeg.clone()),
        config.layout.clone(),
        config.capture.clone(),
    );
    let app = CaptureApp::new(spawn_recorder(recorder), &config.capture);
    gui::run(app, &config.window)?;
    Ok(())
}
