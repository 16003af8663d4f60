use crate::core::video::VideoError;
use crate::core::CameraSide;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Video error: {0}")]
    Video(#[from] VideoError),
    #[error("Camera {0} unavailable: {1}")]
    CameraUnavailable(CameraSide, String),
    #[error("Recorder thread stopped")]
    RecorderStopped,
}
