use crate::core::video::VideoError;
use crate::manifest::ManifestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Landmark sidecar failed to start: {0}")]
    Startup(String),
    #[error("Landmark sidecar exited unexpectedly")]
    SidecarExited,
    #[error("Malformed landmark response: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("Landmark sidecar error: {0}")]
    Sidecar(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Video error: {0}")]
    Video(#[from] VideoError),
    #[error("Landmark error: {0}")]
    Landmark(#[from] LandmarkError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Failed to write keypoints: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),
}
