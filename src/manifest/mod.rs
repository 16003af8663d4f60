//! 片段清单：标签 → 片段路径

pub mod error;
pub mod indexer;
pub mod store;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ManifestError;
pub use indexer::{build_manifest, collect_clip_rows};
pub use store::{read_manifest, write_manifest};

/// One manifest line. Column names stay compatible with pandas consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestRow {
    #[serde(rename = "Class")]
    pub label: String,
    #[serde(rename = "Video_Path")]
    pub clip_path: PathBuf,
}

impl ManifestRow {
    pub fn new(label: impl Into<String>, clip_path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            clip_path: clip_path.into(),
        }
    }
}
