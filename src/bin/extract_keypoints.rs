//! 读取清单，逐个片段提取手部关键点

use clap::Parser;
use hand_sign_data::cli::resolve_camera;
use hand_sign_data::config::PipelineConfig;
use hand_sign_data::core::video::{check_ffmpeg, FfmpegVideoSource, VideoSource};
use hand_sign_data::init_logging;
use hand_sign_data::keypoints::{KeypointExtractor, MediaPipeLandmarker};
use hand_sign_data::manifest::read_manifest;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extract_keypoints", about = "Extract hand keypoints from manifest clips", version)]
struct Args {
    /// 1|front or 2|back; prompted when absent
    camera: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();
    let config = PipelineConfig::load_or_default(args.config.as_deref())?;

    let Some(side) = resolve_camera(args.camera) else {
        return Ok(());
    };

    let rows = read_manifest(&config.layout.manifest_path(side))?;
    info!("✅ {}", check_ffmpeg(&config.ffmpeg)?);

    let landmarker = MediaPipeLandmarker::new(&config.landmarker)?;
    let mut extractor = KeypointExtractor::new(
        landmarker,
        config.extraction.clone(),
        config.layout.keypoint_root.clone(),
    );

    let tools = config.ffmpeg.clone();
    let stats = extractor.run(&rows, |path| {
        let source = FfmpegVideoSource::open(path, &tools)?;
        Ok(Box::new(source) as Box<dyn VideoSource>)
    });

    println!(
        "Hand keypoints extraction completed: {} clips, {} failed, {} frames ({} short clips).",
        stats.clips_processed, stats.clips_failed, stats.frames_written, stats.short_clips
    );
    Ok(())
}
