use super::error::ExtractError;
use super::landmarker::{keypoint_records, HandLandmarker};
use super::npy::save_npy;
use super::sampler::FrameSampler;
use crate::core::video::{VideoError, VideoSource};
use crate::manifest::ManifestRow;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Frames sampled per clip
    pub target_frame_count: usize,
    pub max_hands: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            target_frame_count: 30,
            max_hands: 2,
        }
    }
}

impl ExtractionConfig {
    pub fn single_hand() -> Self {
        Self {
            max_hands: 1,
            ..Self::default()
        }
    }
}

/// Result of extracting one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipExtraction {
    pub clip: PathBuf,
    pub output_dir: PathBuf,
    pub total_frames: u64,
    pub frame_rate: f64,
    pub stride: u64,
    pub frames_written: usize,
    /// Sum of hands over all written frames
    pub hands_detected: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub clips_processed: usize,
    pub clips_failed: usize,
    pub frames_written: usize,
    /// Clips that ended before reaching the target frame count
    pub short_clips: usize,
}

/// `{output_root}/{clip file stem}`
pub fn clip_output_dir(output_root: &Path, clip: &Path) -> PathBuf {
    let stem = clip
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_root.join(stem)
}

/// `keypoints_01.npy` for ordinal 0.
pub fn keypoint_file_name(ordinal: usize) -> String {
    format!("keypoints_{:02}.npy", ordinal + 1)
}

pub struct KeypointExtractor<L: HandLandmarker> {
    landmarker: L,
    config: ExtractionConfig,
    output_root: PathBuf,
    stats: ExtractionStats,
}

impl<L: HandLandmarker> KeypointExtractor<L> {
    pub fn new(landmarker: L, config: ExtractionConfig, output_root: impl Into<PathBuf>) -> Self {
        Self {
            landmarker,
            config,
            output_root: output_root.into(),
            stats: ExtractionStats::default(),
        }
    }

    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    pub fn landmarker(&self) -> &L {
        &self.landmarker
    }

    /// Samples `target_frame_count` frames from `source` and writes one
    /// keypoint file per decoded frame. Stops at the first frame that fails
    /// to decode.
    pub fn process_clip(
        &mut self,
        source: &mut dyn VideoSource,
        clip: &Path,
    ) -> Result<ClipExtraction, ExtractError> {
        let output_dir = clip_output_dir(&self.output_root, clip);
        fs::create_dir_all(&output_dir)?;

        let total_frames = source.frame_count();
        let frame_rate = source.frame_rate();
        let sampler = FrameSampler::new(total_frames, self.config.target_frame_count);
        let stride = sampler.stride();
        debug!(
            "{}: {} frames @ {:.2} fps, stride {}",
            clip.display(),
            total_frames,
            frame_rate,
            stride
        );

        let mut frames_written = 0;
        let mut hands_detected = 0;
        for point in sampler {
            let frame = match source.read_frame_at(point.frame_index)? {
                Some(frame) => frame,
                None => {
                    debug!(
                        "{}: no frame at index {}, stopping",
                        clip.display(),
                        point.frame_index
                    );
                    break;
                }
            };

            let rgb = frame.to_rgb();
            let hands = self.landmarker.detect(&rgb)?;
            let records = keypoint_records(&hands, self.config.max_hands);
            hands_detected += records.nrows();

            save_npy(&output_dir.join(keypoint_file_name(point.ordinal)), &records)?;
            frames_written += 1;
        }

        Ok(ClipExtraction {
            clip: clip.to_path_buf(),
            output_dir,
            total_frames,
            frame_rate,
            stride,
            frames_written,
            hands_detected,
        })
    }

    /// Processes every row in order. A clip that cannot be opened or fails
    /// mid-way is logged, counted and skipped.
    pub fn run<F>(&mut self, rows: &[ManifestRow], mut open: F) -> ExtractionStats
    where
        F: FnMut(&Path) -> Result<Box<dyn VideoSource>, VideoError>,
    {
        info!("🎬 Extracting keypoints from {} clips", rows.len());

        for (i, row) in rows.iter().enumerate() {
            let mut source = match open(&row.clip_path) {
                Ok(source) => source,
                Err(e) => {
                    error!("❌ Cannot open {}: {}", row.clip_path.display(), e);
                    self.stats.clips_failed += 1;
                    continue;
                }
            };

            match self.process_clip(source.as_mut(), &row.clip_path) {
                Ok(result) => {
                    self.stats.clips_processed += 1;
                    self.stats.frames_written += result.frames_written;
                    if result.frames_written < self.config.target_frame_count {
                        self.stats.short_clips += 1;
                        warn!(
                            "⚠️ {} yielded only {} of {} frames",
                            row.clip_path.display(),
                            result.frames_written,
                            self.config.target_frame_count
                        );
                    }
                    info!(
                        "✅ [{}/{}] {} ({}): {} frames, {} hands",
                        i + 1,
                        rows.len(),
                        row.clip_path.display(),
                        row.label,
                        result.frames_written,
                        result.hands_detected
                    );
                }
                Err(e) => {
                    error!("❌ Extraction failed for {}: {}", row.clip_path.display(), e);
                    self.stats.clips_failed += 1;
                }
            }
        }

        info!(
            "🏁 Done: {} processed, {} failed, {} frames written",
            self.stats.clips_processed, self.stats.clips_failed, self.stats.frames_written
        );
        self.stats
    }
}
