//! 摄像头采集 - ffmpeg 读取系统摄像头并输出原始帧

use super::error::VideoError;
use super::ffmpeg::FfmpegTools;
use super::frame::{Frame, PixelFormat};
use log::{debug, info, warn};
use serde::Deserialize;
use std::io::Read;
use std::process::{Child, ChildStdout, Stdio};
use std::time::{Duration, Instant};

pub trait CameraDevice: Send {
    /// Grabs the next frame; `None` once the device stops delivering frames.
    fn read_frame(&mut self) -> Option<Frame>;

    fn name(&self) -> &str;
}

#[cfg(target_os = "linux")]
const DEFAULT_INPUT_FORMAT: &str = "v4l2";
#[cfg(target_os = "macos")]
const DEFAULT_INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
const DEFAULT_INPUT_FORMAT: &str = "dshow";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const DEFAULT_INPUT_FORMAT: &str = "v4l2";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSpec {
    /// OS device index (0 = built-in camera)
    pub index: u32,
    /// ffmpeg input device format (`v4l2`, `avfoundation`, `dshow`)
    pub input_format: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            index: 0,
            input_format: DEFAULT_INPUT_FORMAT.to_string(),
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl CameraSpec {
    pub fn with_index(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Device argument for ffmpeg's `-i`.
    pub fn device_url(&self) -> String {
        match self.input_format.as_str() {
            "avfoundation" => format!("{}:none", self.index),
            "dshow" => format!("video={}", self.index),
            _ => format!("/dev/video{}", self.index),
        }
    }
}

/// Camera read through an ffmpeg subprocess streaming raw RGB frames.
pub struct FfmpegCamera {
    name: String,
    width: u32,
    height: u32,
    process: Child,
    stdout: ChildStdout,
    frames_read: u64,
    started: Instant,
}

impl FfmpegCamera {
    pub fn open(spec: &CameraSpec, tools: &FfmpegTools) -> Result<Self, VideoError> {
        let name = spec.device_url();
        info!("📷 Opening camera {} via {}", name, spec.input_format);

        let mut process = tools
            .ffmpeg_command()
            .args(["-v", "error", "-f", &spec.input_format])
            .args(["-framerate", &spec.fps.to_string()])
            .args(["-video_size", &format!("{}x{}", spec.width, spec.height)])
            .args(["-i", &name])
            .args([
                "-an",
                "-f",
                "rawvideo",
                "-pix_fmt",
                PixelFormat::Rgb24.ffmpeg_name(),
                "-s",
                &format!("{}x{}", spec.width, spec.height),
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| VideoError::FfmpegMissing(format!("{}: {}", tools.ffmpeg, e)))?;

        let stdout = match process.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = process.kill();
                return Err(VideoError::Encoder(format!("no stdout for camera {}", name)));
            }
        };

        Ok(Self {
            name,
            width: spec.width,
            height: spec.height,
            process,
            stdout,
            frames_read: 0,
            started: Instant::now(),
        })
    }
}

impl CameraDevice for FfmpegCamera {
    fn read_frame(&mut self) -> Option<Frame> {
        let mut data = vec![0u8; Frame::byte_len(self.width, self.height, PixelFormat::Rgb24)];
        if let Err(e) = self.stdout.read_exact(&mut data) {
            warn!("⚠️ Camera {} stopped delivering frames: {}", self.name, e);
            return None;
        }

        let frame = Frame::new(
            self.width,
            self.height,
            PixelFormat::Rgb24,
            data,
            self.started.elapsed().as_millis() as u64,
            self.frames_read,
        );
        self.frames_read += 1;
        Some(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
        info!("🗑️ Camera {} released after {} frames", self.name, self.frames_read);
    }
}

/// Synthetic camera for tests: a fixed number of frames, optional per-read delay.
pub struct MockCamera {
    name: String,
    width: u32,
    height: u32,
    remaining: Option<u64>,
    delay: Duration,
    frames_read: u64,
}

impl MockCamera {
    /// Never runs out of frames.
    pub fn endless(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 4,
            height: 3,
            remaining: None,
            delay: Duration::ZERO,
            frames_read: 0,
        }
    }

    pub fn with_frames(name: &str, frames: u64) -> Self {
        Self {
            remaining: Some(frames),
            ..Self::endless(name)
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl CameraDevice for MockCamera {
    fn read_frame(&mut self) -> Option<Frame> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                debug!("Mock camera {} exhausted", self.name);
                return None;
            }
            *remaining -= 1;
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let frame = Frame::new(
            self.width,
            self.height,
            PixelFormat::Rgb24,
            vec![128u8; Frame::byte_len(self.width, self.height, PixelFormat::Rgb24)],
            0,
            self.frames_read,
        );
        self.frames_read += 1;
        Some(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_url_per_format() {
        let mut spec = CameraSpec::with_index(2);
        spec.input_format = "v4l2".to_string();
        assert_eq!(spec.device_url(), "/dev/video2");

        spec.input_format = "avfoundation".to_string();
        assert_eq!(spec.device_url(), "2:none");

        spec.input_format = "dshow".to_string();
        assert_eq!(spec.device_url(), "video=2");
    }

    #[test]
    fn test_default_spec_matches_recording_format() {
        let spec = CameraSpec::default();
        assert_eq!((spec.width, spec.height, spec.fps), (640, 480, 30));
        assert_eq!(spec.index, 0);
    }

    #[test]
    fn test_mock_camera_runs_out() {
        let mut camera = MockCamera::with_frames("cam", 2);
        assert!(camera.read_frame().is_some());
        assert!(camera.read_frame().is_some());
        assert!(camera.read_frame().is_none());
        assert_eq!(camera.frames_read(), 2);
    }
}
