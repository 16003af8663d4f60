//! 采集界面逻辑：按钮状态 + 录制线程通信，不涉及绘制

use super::board::{ButtonBoard, ButtonState};
use crate::capture::{CaptureConfig, CaptureOutcome, RecorderHandle};
use crate::core::Label;
use log::{debug, error, info, warn};
use std::collections::VecDeque;
use std::time::Instant;

pub struct CaptureApp {
    board: ButtonBoard,
    recorder: RecorderHandle,
    /// Requests sent to the recorder; it serves them front first
    in_flight: VecDeque<Label>,
    status: String,
}

impl CaptureApp {
    pub fn new(recorder: RecorderHandle, config: &CaptureConfig) -> Self {
        Self {
            board: ButtonBoard::new(config.start_delay()),
            recorder,
            in_flight: VecDeque::new(),
            status: "Click a button to record. Q cancels, Esc quits.".to_string(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn button_state(&self, label: Label) -> ButtonState {
        self.board.state(label)
    }

    pub fn click(&mut self, label: Label, now: Instant) {
        if self.board.press(label, now) {
            info!("🔘 '{}' pressed, recording starts shortly", label);
        }
    }

    /// Sends requests whose countdown elapsed and collects finished captures.
    pub fn tick(&mut self, now: Instant) {
        for label in self.board.take_due(now) {
            match self.recorder.request(label) {
                Ok(()) => self.in_flight.push_back(label),
                Err(e) => {
                    error!("❌ Cannot start capture for '{}': {}", label, e);
                    self.status = format!("{}: {}", label, e);
                    self.board.complete(label);
                }
            }
        }

        while let Some(reply) = self.recorder.try_reply() {
            self.in_flight.retain(|&label| label != reply.label);
            self.board.complete(reply.label);
            self.status = match &reply.result {
                Ok(outcome) => outcome.summary(reply.label),
                Err(e) => format!("{}: failed ({})", reply.label, e),
            };
        }

        if let Some((label, left)) = self.board.next_countdown(now) {
            self.status = format!("{}: starting in {:.1}s", label, left.as_secs_f32());
        } else if let Some(&label) = self.in_flight.front() {
            self.status = match self.in_flight.len() - 1 {
                0 => format!("{}: recording... (Q to cancel)", label),
                queued => format!("{}: recording... (Q to cancel, {} queued)", label, queued),
            };
        }
    }

    /// Cancels the capture in progress. Ignored while nothing is recording,
    /// and when that capture finished before its reply was collected.
    pub fn cancel(&mut self) -> bool {
        let Some(&label) = self.in_flight.front() else {
            return false;
        };
        let cancelled = self.recorder.cancel(label);
        if cancelled {
            warn!("⏹️ Cancel requested for '{}'", label);
        } else {
            debug!("Cancel for '{}' ignored, capture not running", label);
        }
        cancelled
    }

    /// Stops the recorder thread and releases the cameras.
    pub fn shutdown(&mut self) {
        self.recorder.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{spawn_recorder, ClipRecorder, MockBackend};
    use crate::core::{CameraSide, DatasetLayout};
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn app_with(backend: MockBackend, layout: DatasetLayout) -> CaptureApp {
        let config = CaptureConfig {
            delay_ms: 0,
            duration_secs: 60,
            grace_secs: 0,
            ..Default::default()
        };
        let recorder = ClipRecorder::new(backend, layout, config.clone());
        CaptureApp::new(spawn_recorder(recorder), &config)
    }

    fn tick_until_idle(app: &mut CaptureApp, label: Label) {
        for _ in 0..500 {
            app.tick(Instant::now());
            if app.button_state(label).is_enabled() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("capture for '{}' never finished", label);
    }

    #[test]
    fn test_click_records_and_reenables() {
        let dir = tempdir().unwrap();
        let layout = DatasetLayout::rooted_at(dir.path());
        let backend = MockBackend::with_camera_frames(3);
        let mut app = app_with(backend.clone(), layout.clone());
        let label = Label::new('k').unwrap();

        app.click(label, Instant::now());
        assert!(!app.button_state(label).is_enabled());

        tick_until_idle(&mut app, label);
        assert!(app.status().starts_with("k: recorded 3 frames"));
        assert_eq!(backend.writers().len(), 2);
        assert!(layout.label_dir(CameraSide::Back, label).is_dir());
    }

    #[test]
    fn test_cancel_stops_recording() {
        let dir = tempdir().unwrap();
        let backend = MockBackend::new();
        let mut app = app_with(backend, DatasetLayout::rooted_at(dir.path()));
        let label = Label::new('5').unwrap();

        app.click(label, Instant::now());
        app.tick(Instant::now());
        assert_eq!(app.button_state(label), ButtonState::Recording);

        let mut cancelled = false;
        for _ in 0..500 {
            if app.cancel() {
                cancelled = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(cancelled);
        tick_until_idle(&mut app, label);
        assert!(app.status().contains("cancelled"));
    }

    #[test]
    fn test_late_cancel_does_not_hit_next_capture() {
        let dir = tempdir().unwrap();
        let backend = MockBackend::with_camera_frames(3);
        let mut app = app_with(backend.clone(), DatasetLayout::rooted_at(dir.path()));
        let a = Label::new('a').unwrap();
        let b = Label::new('b').unwrap();

        app.click(a, Instant::now());
        app.tick(Instant::now());
        assert_eq!(app.button_state(a), ButtonState::Recording);

        // 'a' finishes on the recorder thread; its reply is not collected yet
        for _ in 0..500 {
            if backend.writers().iter().all(|(_, w)| w.snapshot().finished)
                && backend.writers().len() == 2
            {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        thread::sleep(Duration::from_millis(50));
        assert_eq!(app.button_state(a), ButtonState::Recording);
        assert!(!app.cancel());

        tick_until_idle(&mut app, a);
        app.click(b, Instant::now());
        tick_until_idle(&mut app, b);

        assert!(app.status().starts_with("b: recorded 3 frames"));
        assert!(!app.status().contains("cancelled"));
    }

    #[test]
    fn test_status_counts_queued_captures() {
        let dir = tempdir().unwrap();
        let mut app = app_with(MockBackend::new(), DatasetLayout::rooted_at(dir.path()));
        let a = Label::new('a').unwrap();
        let b = Label::new('b').unwrap();

        app.click(a, Instant::now());
        app.click(b, Instant::now());
        app.tick(Instant::now());
        assert_eq!(app.status(), "a: recording... (Q to cancel, 1 queued)");

        for _ in 0..500 {
            app.cancel();
            app.tick(Instant::now());
            if app.button_state(a).is_enabled() && app.button_state(b).is_enabled() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(app.button_state(a).is_enabled());
        assert!(app.button_state(b).is_enabled());
        assert!(app.status().starts_with("b: recorded"));
    }
}
