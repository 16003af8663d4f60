//! 片段录制器 - 持有两个摄像头句柄，逐个执行录制请求

use super::error::CaptureError;
use super::session::{record_pair, SessionLimits, SessionReport, StopReason};
use crate::core::video::{
    CameraDevice, CameraSpec, ClipWriter, EncoderSettings, FfmpegCamera, FfmpegClipWriter,
    FfmpegTools, MockCamera, MockClipWriter,
};
use crate::core::{CameraSide, DatasetLayout, Label};
use chrono::Local;
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Delay between pressing a button and the recording start
    pub delay_ms: u64,
    pub duration_secs: u64,
    pub grace_secs: u64,
    /// Maximum clips per label per camera
    pub clip_cap: usize,
    pub front_camera: CameraSpec,
    pub back_camera: CameraSpec,
    pub encoder: EncoderSettings,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            duration_secs: 30,
            grace_secs: 1,
            clip_cap: 50,
            front_camera: CameraSpec::with_index(0),
            back_camera: CameraSpec::with_index(2),
            encoder: EncoderSettings::default(),
        }
    }
}

impl CaptureConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn limits(&self) -> SessionLimits {
        SessionLimits {
            duration: Duration::from_secs(self.duration_secs),
            grace: Duration::from_secs(self.grace_secs),
        }
    }

    pub fn camera_spec(&self, side: CameraSide) -> &CameraSpec {
        match side {
            CameraSide::Front => &self.front_camera,
            CameraSide::Back => &self.back_camera,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Recorded {
        front_clip: PathBuf,
        back_clip: PathBuf,
        report: SessionReport,
    },
    CapReached {
        front_count: usize,
        back_count: usize,
    },
}

impl CaptureOutcome {
    /// One-line description for the status bar.
    pub fn summary(&self, label: Label) -> String {
        match self {
            CaptureOutcome::Recorded { report, .. } => format!(
                "{}: recorded {} frames in {:.1}s ({})",
                label,
                report.front_frames,
                report.elapsed.as_secs_f32(),
                match report.stop_reason {
                    StopReason::DurationElapsed => "done".to_string(),
                    StopReason::Cancelled => "cancelled".to_string(),
                    StopReason::ReadFailed(side) => format!("{} camera stopped", side),
                }
            ),
            CaptureOutcome::CapReached { .. } => format!("{}: reached maximum clips", label),
        }
    }
}

/// Opens cameras and clip writers; lets the recorder run against mocks.
pub trait CaptureBackend: Send {
    fn open_camera(
        &mut self,
        side: CameraSide,
        spec: &CameraSpec,
    ) -> Result<Box<dyn CameraDevice>, CaptureError>;

    fn create_writer(
        &mut self,
        path: &Path,
        settings: &EncoderSettings,
    ) -> Result<Box<dyn ClipWriter>, CaptureError>;
}

pub struct FfmpegBackend {
    tools: FfmpegTools,
}

impl FfmpegBackend {
    pub fn new(tools: FfmpegTools) -> Self {
        Self { tools }
    }
}

impl CaptureBackend for FfmpegBackend {
    fn open_camera(
        &mut self,
        side: CameraSide,
        spec: &CameraSpec,
    ) -> Result<Box<dyn CameraDevice>, CaptureError> {
        let camera = FfmpegCamera::open(spec, &self.tools)
            .map_err(|e| CaptureError::CameraUnavailable(side, e.to_string()))?;
        Ok(Box::new(camera))
    }

    fn create_writer(
        &mut self,
        path: &Path,
        settings: &EncoderSettings,
    ) -> Result<Box<dyn ClipWriter>, CaptureError> {
        Ok(Box::new(FfmpegClipWriter::create(path, settings, &self.tools)?))
    }
}

/// Mock cameras plus writers that create an empty clip file on disk.
#[derive(Clone, Default)]
pub struct MockBackend {
    camera_frames: Option<u64>,
    camera_opens: Arc<AtomicUsize>,
    writers: Arc<Mutex<Vec<(PathBuf, MockClipWriter)>>>,
}

impl MockBackend {
    /// Cameras that never run out of frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cameras that deliver `frames` frames each, then fail.
    pub fn with_camera_frames(frames: u64) -> Self {
        Self {
            camera_frames: Some(frames),
            ..Self::default()
        }
    }

    pub fn camera_opens(&self) -> usize {
        self.camera_opens.load(Ordering::SeqCst)
    }

    pub fn writers(&self) -> Vec<(PathBuf, MockClipWriter)> {
        self.writers.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl CaptureBackend for MockBackend {
    fn open_camera(
        &mut self,
        side: CameraSide,
        _spec: &CameraSpec,
    ) -> Result<Box<dyn CameraDevice>, CaptureError> {
        self.camera_opens.fetch_add(1, Ordering::SeqCst);
        let camera = match self.camera_frames {
            Some(frames) => MockCamera::with_frames(side.dir_name(), frames),
            None => MockCamera::endless(side.dir_name()),
        };
        Ok(Box::new(camera))
    }

    fn create_writer(
        &mut self,
        path: &Path,
        settings: &EncoderSettings,
    ) -> Result<Box<dyn ClipWriter>, CaptureError> {
        fs::File::create(path)?;
        let writer = MockClipWriter::sized(settings.width, settings.height);
        if let Ok(mut writers) = self.writers.lock() {
            writers.push((path.to_path_buf(), writer.clone()));
        }
        Ok(Box::new(writer))
    }
}

struct CameraPair {
    front: Box<dyn CameraDevice>,
    back: Box<dyn CameraDevice>,
}

pub struct ClipRecorder<B: CaptureBackend> {
    backend: B,
    layout: DatasetLayout,
    config: CaptureConfig,
    cameras: Option<CameraPair>,
}

impl<B: CaptureBackend> ClipRecorder<B> {
    pub fn new(backend: B, layout: DatasetLayout, config: CaptureConfig) -> Self {
        Self {
            backend,
            layout,
            config,
            cameras: None,
        }
    }

    pub fn cameras_open(&self) -> bool {
        self.cameras.is_some()
    }

    /// Drops both camera handles; the next capture reopens them.
    pub fn release_cameras(&mut self) {
        if self.cameras.take().is_some() {
            info!("🗑️ Camera handles released");
        }
    }

    fn ensure_cameras(&mut self) -> Result<(), CaptureError> {
        if self.cameras.is_none() {
            let front = self
                .backend
                .open_camera(CameraSide::Front, self.config.camera_spec(CameraSide::Front))?;
            let back = self
                .backend
                .open_camera(CameraSide::Back, self.config.camera_spec(CameraSide::Back))?;
            info!("📷 Cameras ready: front {} / back {}", front.name(), back.name());
            self.cameras = Some(CameraPair { front, back });
        }
        Ok(())
    }

    /// Records one clip per camera for `label`, unless either label
    /// directory already holds `clip_cap` clips.
    pub fn capture(
        &mut self,
        label: Label,
        cancel: &AtomicBool,
    ) -> Result<CaptureOutcome, CaptureError> {
        info!("🎥 Capture requested for '{}'", label);
        self.ensure_cameras()?;

        let front_dir = self.layout.label_dir(CameraSide::Front, label);
        let back_dir = self.layout.label_dir(CameraSide::Back, label);
        fs::create_dir_all(&front_dir)?;
        fs::create_dir_all(&back_dir)?;

        let front_count = count_clips(&front_dir, &self.layout.clip_extension)?;
        let back_count = count_clips(&back_dir, &self.layout.clip_extension)?;
        debug!("Existing clips for '{}': front {}, back {}", label, front_count, back_count);

        if front_count >= self.config.clip_cap || back_count >= self.config.clip_cap {
            warn!(
                "⚠️ Reached maximum videos ({}) for button '{}'",
                self.config.clip_cap, label
            );
            return Ok(CaptureOutcome::CapReached {
                front_count,
                back_count,
            });
        }

        // One-second resolution; two captures in the same second overwrite
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let file_name = self.layout.clip_file_name(label, &timestamp);
        let front_clip = front_dir.join(&file_name);
        let back_clip = back_dir.join(&file_name);

        let mut front_out = self.backend.create_writer(&front_clip, &self.config.encoder)?;
        let mut back_out = self.backend.create_writer(&back_clip, &self.config.encoder)?;

        let limits = self.config.limits();
        let cameras = self.cameras.as_mut().ok_or_else(|| {
            CaptureError::CameraUnavailable(CameraSide::Front, "not open".to_string())
        })?;
        let result = record_pair(
            cameras.front.as_mut(),
            cameras.back.as_mut(),
            front_out.as_mut(),
            back_out.as_mut(),
            &limits,
            cancel,
        );

        let front_finished = front_out.finish();
        let back_finished = back_out.finish();
        let report = result?;
        front_finished?;
        back_finished?;

        if let StopReason::ReadFailed(side) = report.stop_reason {
            warn!("⚠️ {} camera stopped delivering frames, will reopen on next capture", side);
            self.release_cameras();
        }

        Ok(CaptureOutcome::Recorded {
            front_clip,
            back_clip,
            report,
        })
    }
}

impl<B: CaptureBackend> Drop for ClipRecorder<B> {
    fn drop(&mut self) {
        self.release_cameras();
    }
}

/// Counts files ending in `.{extension}` directly inside `dir`.
pub fn count_clips(dir: &Path, extension: &str) -> io::Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let suffix = format!(".{}", extension);
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && entry.file_name().to_string_lossy().ends_with(&suffix) {
            count += 1;
        }
    }
    Ok(count)
}
