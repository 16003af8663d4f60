//! 视频 I/O：摄像头采集、片段编码、片段解码
//!
//! All three go through ffmpeg subprocesses behind traits, so the capture
//! and extraction logic can run against in-memory mocks.

pub mod camera;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod source;
pub mod writer;

pub use camera::{CameraDevice, CameraSpec, FfmpegCamera, MockCamera};
pub use error::VideoError;
pub use ffmpeg::{check_ffmpeg, FfmpegTools};
pub use frame::{Frame, PixelFormat};
pub use source::{FfmpegVideoSource, MockVideoSource, StreamInfo, VideoSource};
pub use writer::{ClipWriter, EncoderSettings, FfmpegClipWriter, MockClipWriter};
