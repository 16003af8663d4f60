use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("FFmpeg not available: {0}")]
    FfmpegMissing(String),
    #[error("ffprobe failed for {path}: {message}")]
    Inspect { path: String, message: String },
    #[error("Malformed ffprobe output: {0}")]
    StreamInfoParse(#[from] serde_json::Error),
    #[error("No video stream in {0}")]
    NoVideoStream(String),
    #[error("Invalid frame data: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },
    #[error("Encoder failed: {0}")]
    Encoder(String),
}
