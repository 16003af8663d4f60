//! 采集界面
//!
//! 每个标签一个按钮（10 列网格），点击后延迟开始录制；录制在独立线程执行，
//! 界面线程只负责轮询输入、倒计时和显示状态。

pub mod app;
pub mod board;
pub mod font;
pub mod grid;
pub mod window;

pub use app::CaptureApp;
pub use board::{ButtonBoard, ButtonState};
pub use grid::{button_rect, hit_test, Rect};
pub use window::{run, GuiError, WindowConfig};
