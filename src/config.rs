//! 全局配置 - 所有常量均可由 JSON 文件覆盖，缺省字段取默认值

use crate::capture::CaptureConfig;
use crate::core::video::FfmpegTools;
use crate::core::DatasetLayout;
use crate::gui::WindowConfig;
use crate::keypoints::{ExtractionConfig, LandmarkerConfig};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: DatasetLayout,
    pub ffmpeg: FfmpegTools,
    pub capture: CaptureConfig,
    pub extraction: ExtractionConfig,
    pub landmarker: LandmarkerConfig,
    pub window: WindowConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!("⚙️ Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json(
            r#"{
                "capture": { "delay_ms": 500, "clip_cap": 10, "back_camera": { "index": 1 } },
                "extraction": { "target_frame_count": 15 },
                "layout": { "clip_root": "/data/clips" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.capture.delay_ms, 500);
        assert_eq!(config.capture.clip_cap, 10);
        assert_eq!(config.capture.duration_secs, 30);
        assert_eq!(config.capture.back_camera.index, 1);
        assert_eq!(config.capture.back_camera.width, 640);
        assert_eq!(config.capture.front_camera.index, 0);
        assert_eq!(config.extraction.target_frame_count, 15);
        assert_eq!(config.extraction.max_hands, 2);
        assert_eq!(config.layout.clip_root, PathBuf::from("/data/clips"));
        assert_eq!(config.layout.clip_extension, "mov");
        assert_eq!(config.landmarker, LandmarkerConfig::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(PipelineConfig::from_json("{}").unwrap(), PipelineConfig::default());
        assert_eq!(PipelineConfig::load_or_default(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(PipelineConfig::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(PipelineConfig::load(&bad), Err(ConfigError::Json { .. })));
    }
}
