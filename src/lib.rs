pub mod capture;
pub mod cli;
pub mod config;
pub mod core;
pub mod gui;
pub mod keypoints;
pub mod manifest;

use env_logger::Env;

pub fn init_logging() {
    // RUST_LOG overrides the default level
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
