//! 片段编码 - 原始帧通过管道送入 ffmpeg（H.264，无音频）

use super::error::VideoError;
use super::ffmpeg::FfmpegTools;
use super::frame::{Frame, PixelFormat};
use log::{info, warn};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Stdio};
use std::sync::{Arc, Mutex};

pub trait ClipWriter: Send {
    /// Frames must arrive at this size; callers resize beforehand.
    fn frame_size(&self) -> (u32, u32);

    fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError>;

    /// Flushes and closes the clip. Calling it twice is a no-op.
    fn finish(&mut self) -> Result<(), VideoError>;

    fn frames_written(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub codec: String,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            fps: 30,
            width: 640,
            height: 480,
        }
    }
}

pub struct FfmpegClipWriter {
    path: PathBuf,
    settings: EncoderSettings,
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    frames_written: u64,
}

impl FfmpegClipWriter {
    pub fn create(
        path: &Path,
        settings: &EncoderSettings,
        tools: &FfmpegTools,
    ) -> Result<Self, VideoError> {
        let mut process = tools
            .ffmpeg_command()
            .args(["-v", "error", "-y"])
            .args(["-f", "rawvideo", "-pix_fmt", PixelFormat::Rgb24.ffmpeg_name()])
            .args(["-s", &format!("{}x{}", settings.width, settings.height)])
            .args(["-r", &settings.fps.to_string()])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", &settings.codec, "-pix_fmt", "yuv420p"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| VideoError::FfmpegMissing(format!("{}: {}", tools.ffmpeg, e)))?;

        let stdin = process.stdin.take();
        info!("🎬 Writing {} ({}x{} @ {} fps)", path.display(), settings.width, settings.height, settings.fps);

        Ok(Self {
            path: path.to_path_buf(),
            settings: settings.clone(),
            process: Some(process),
            stdin,
            frames_written: 0,
        })
    }
}

impl ClipWriter for FfmpegClipWriter {
    fn frame_size(&self) -> (u32, u32) {
        (self.settings.width, self.settings.height)
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VideoError::Encoder(format!("{} already finished", self.path.display())))?;

        if (frame.width, frame.height) != (self.settings.width, self.settings.height) {
            return Err(VideoError::FrameSize {
                expected: Frame::byte_len(self.settings.width, self.settings.height, frame.format),
                actual: frame.data.len(),
            });
        }
        let frame = frame.to_rgb();
        stdin.write_all(&frame.data)?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        // Closing stdin signals end of input to the encoder
        drop(self.stdin.take());

        let Some(mut process) = self.process.take() else {
            return Ok(());
        };
        let status = process.wait()?;
        if !status.success() {
            return Err(VideoError::Encoder(format!(
                "ffmpeg exited with {} for {}",
                status,
                self.path.display()
            )));
        }

        info!("✅ Saved {} ({} frames)", self.path.display(), self.frames_written);
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Drop for FfmpegClipWriter {
    fn drop(&mut self) {
        if self.process.is_some() {
            if let Err(e) = self.finish() {
                warn!("⚠️ Writer for {} closed with error: {}", self.path.display(), e);
            }
        }
    }
}

/// Records frame sizes in memory; the log is shared so tests can inspect
/// it after the writer has been boxed and handed off.
#[derive(Clone)]
pub struct MockClipWriter {
    size: (u32, u32),
    log: Arc<Mutex<MockWriterLog>>,
}

#[derive(Debug, Clone, Default)]
pub struct MockWriterLog {
    pub frames: u64,
    pub last_size: Option<(u32, u32)>,
    pub finished: bool,
    pub fail_after: Option<u64>,
}

impl Default for MockClipWriter {
    /// Same size as the default `MockCamera` frames.
    fn default() -> Self {
        Self::sized(4, 3)
    }
}

impl MockClipWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer that only accepts `width`x`height` frames.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            log: Arc::new(Mutex::new(MockWriterLog::default())),
        }
    }

    /// Fails the write after `frames` successful writes.
    pub fn failing_after(frames: u64) -> Self {
        let writer = Self::default();
        if let Ok(mut log) = writer.log.lock() {
            log.fail_after = Some(frames);
        }
        writer
    }

    pub fn snapshot(&self) -> MockWriterLog {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl ClipWriter for MockClipWriter {
    fn frame_size(&self) -> (u32, u32) {
        self.size
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError> {
        frame.validate()?;
        if (frame.width, frame.height) != self.size {
            return Err(VideoError::FrameSize {
                expected: Frame::byte_len(self.size.0, self.size.1, frame.format),
                actual: frame.data.len(),
            });
        }
        let mut log = self
            .log
            .lock()
            .map_err(|e| VideoError::Encoder(format!("mock writer poisoned: {}", e)))?;
        if log.fail_after.is_some_and(|limit| log.frames >= limit) {
            return Err(VideoError::Encoder("mock write failure".to_string()));
        }
        log.frames += 1;
        log.last_size = Some((frame.width, frame.height));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        if let Ok(mut log) = self.log.lock() {
            log.finished = true;
        }
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.snapshot().frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(4, 3, PixelFormat::Rgb24, vec![0u8; 36], 0, 0)
    }

    #[test]
    fn test_mock_writer_counts_frames() {
        let mut writer = MockClipWriter::new();
        let handle = writer.clone();
        writer.write_frame(&frame()).unwrap();
        writer.write_frame(&frame()).unwrap();
        writer.finish().unwrap();

        let log = handle.snapshot();
        assert_eq!(log.frames, 2);
        assert_eq!(log.last_size, Some((4, 3)));
        assert!(log.finished);
        assert_eq!(writer.frames_written(), 2);
    }

    #[test]
    fn test_mock_writer_failure() {
        let mut writer = MockClipWriter::failing_after(1);
        assert!(writer.write_frame(&frame()).is_ok());
        assert!(matches!(writer.write_frame(&frame()), Err(VideoError::Encoder(_))));
    }

    #[test]
    fn test_mock_writer_rejects_other_sizes() {
        let mut writer = MockClipWriter::sized(8, 6);
        assert_eq!(writer.frame_size(), (8, 6));
        assert!(matches!(
            writer.write_frame(&frame()),
            Err(VideoError::FrameSize { expected: 144, actual: 36 })
        ));
        assert_eq!(writer.frames_written(), 0);
    }

    #[test]
    fn test_default_encoder_settings() {
        let settings = EncoderSettings::default();
        assert_eq!(settings.codec, "libx264");
        assert_eq!((settings.width, settings.height, settings.fps), (640, 480, 30));
    }
}
