//! 数据集目录布局
//!
//! ```text
//! hand_sign_data/{front,back}/{label}/{label}_{timestamp}.mov
//! data_{front,back}.csv
//! data/{clip_stem}/keypoints_{NN}.npy
//! ```

use super::{CameraSide, Label};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    pub clip_root: PathBuf,
    pub manifest_dir: PathBuf,
    pub keypoint_root: PathBuf,
    /// Clip extension without the dot
    pub clip_extension: String,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            clip_root: PathBuf::from("hand_sign_data"),
            manifest_dir: PathBuf::from("."),
            keypoint_root: PathBuf::from("data"),
            clip_extension: "mov".to_string(),
        }
    }
}

impl DatasetLayout {
    /// Rooted at `root`; all three trees live under it.
    pub fn rooted_at(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            clip_root: root.join(defaults.clip_root),
            manifest_dir: root.to_path_buf(),
            keypoint_root: root.join(defaults.keypoint_root),
            clip_extension: defaults.clip_extension,
        }
    }

    pub fn camera_root(&self, side: CameraSide) -> PathBuf {
        self.clip_root.join(side.dir_name())
    }

    pub fn label_dir(&self, side: CameraSide, label: Label) -> PathBuf {
        self.camera_root(side).join(label.to_string())
    }

    pub fn clip_file_name(&self, label: Label, timestamp: &str) -> String {
        format!("{}_{}.{}", label, timestamp, self.clip_extension)
    }

    pub fn manifest_path(&self, side: CameraSide) -> PathBuf {
        self.manifest_dir.join(format!("data_{}.csv", side.dir_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let layout = DatasetLayout::default();
        let label = Label::new('k').unwrap();

        assert_eq!(
            layout.label_dir(CameraSide::Back, label),
            PathBuf::from("hand_sign_data").join("back").join("k")
        );
        assert_eq!(
            layout.clip_file_name(label, "20240101_120000"),
            "k_20240101_120000.mov"
        );
        assert_eq!(
            layout.manifest_path(CameraSide::Front),
            PathBuf::from(".").join("data_front.csv")
        );
    }

    #[test]
    fn test_rooted_layout() {
        let layout = DatasetLayout::rooted_at(Path::new("/tmp/set"));
        assert_eq!(layout.camera_root(CameraSide::Front), PathBuf::from("/tmp/set/hand_sign_data/front"));
        assert_eq!(layout.keypoint_root, PathBuf::from("/tmp/set/data"));
        assert_eq!(layout.manifest_path(CameraSide::Back), PathBuf::from("/tmp/set/data_back.csv"));
    }
}
