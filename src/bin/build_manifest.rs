//! 扫描片段目录，生成 data_{front,back}.csv

use clap::Parser;
use hand_sign_data::cli::resolve_camera;
use hand_sign_data::config::PipelineConfig;
use hand_sign_data::init_logging;
use hand_sign_data::manifest::build_manifest;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "build_manifest", about = "Index recorded clips into a CSV manifest", version)]
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

    let layout = &config.layout;
    let manifest_path = layout.manifest_path(side);
    let rows = build_manifest(
        &layout.camera_root(side),
        &manifest_path,
        &layout.clip_extension,
    )?;
    println!("DataFrame saved to {} ({} clips)", manifest_path.display(), rows.len());
    Ok(())
}
