//! 手部关键点提取 - 从片段中均匀采样帧并保存每帧的手部关键点
//!
//! 核心流程：
//! 1. 等间隔采样 - 步长 = 总帧数 / 目标帧数（至少为 1）
//! 2. 颜色转换 - 解码帧转为 RGB
//! 3. 关键点检测 - 每只手 21 个点 × (x, y, z)
//! 4. 保存 - 每个采样帧一个 `.npy` 文件

pub mod error;
pub mod landmarker;
pub mod mediapipe;
pub mod npy;
pub mod pipeline;
pub mod sampler;

pub use error::{ExtractError, LandmarkError};
pub use landmarker::{
    keypoint_records, HandLandmarker, HandLandmarks, Landmark, MockHandLandmarker,
    KEYPOINTS_PER_HAND, LANDMARKS_PER_HAND,
};
pub use mediapipe::{LandmarkerConfig, MediaPipeLandmarker};
pub use npy::{load_npy, save_npy, write_npy};
pub use pipeline::{
    clip_output_dir, keypoint_file_name, ClipExtraction, ExtractionConfig, ExtractionStats,
    KeypointExtractor,
};
pub use sampler::{frame_stride, sample_points, FrameSampler, SamplePoint};
