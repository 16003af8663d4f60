//! 双摄像头录制
//!
//! 1. `session` - 定时录制任务，可取消
//! 2. `recorder` - 目录、上限检查、文件命名，持有摄像头句柄
//! 3. `worker` - 录制线程，按请求顺序逐个执行

pub mod error;
pub mod recorder;
pub mod session;
pub mod worker;

pub use error::CaptureError;
pub use recorder::{
    count_clips, CaptureBackend, CaptureConfig, CaptureOutcome, ClipRecorder, FfmpegBackend,
    MockBackend,
};
pub use session::{record_pair, SessionLimits, SessionReport, StopReason};
pub use worker::{spawn_recorder, CaptureReply, CaptureRequest, RecorderHandle};
