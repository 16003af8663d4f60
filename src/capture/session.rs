use super::error::CaptureError;
use crate::core::video::{CameraDevice, ClipWriter, Frame};
use crate::core::CameraSide;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DurationElapsed,
    ReadFailed(CameraSide),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub duration: Duration,
    /// Extra time after `duration` before the loop gives up
    pub grace: Duration,
}

impl SessionLimits {
    pub fn total(&self) -> Duration {
        self.duration + self.grace
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(30),
            grace: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub front_frames: u64,
    pub back_frames: u64,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

/// Writes `frame`, resized first when it differs from the writer's size.
fn write_fitted(out: &mut dyn ClipWriter, frame: &Frame) -> Result<(), CaptureError> {
    let (width, height) = out.frame_size();
    if (frame.width, frame.height) == (width, height) {
        out.write_frame(frame)?;
    } else {
        out.write_frame(&frame.resize_to(width, height)?)?;
    }
    Ok(())
}

/// Records both cameras until the time limit, a failed read, or `cancel`.
///
/// Each iteration reads camera 1 then camera 2 and writes both frames; a
/// frame pair is only written when both reads succeed, so the two clips
/// always hold the same number of frames. No timestamp alignment is done.
pub fn record_pair(
    front: &mut dyn CameraDevice,
    back: &mut dyn CameraDevice,
    front_out: &mut dyn ClipWriter,
    back_out: &mut dyn ClipWriter,
    limits: &SessionLimits,
    cancel: &AtomicBool,
) -> Result<SessionReport, CaptureError> {
    let started = Instant::now();
    let mut pairs = 0u64;

    let stop_reason = loop {
        if cancel.load(Ordering::SeqCst) {
            break StopReason::Cancelled;
        }
        if started.elapsed() > limits.total() {
            break StopReason::DurationElapsed;
        }

        let Some(front_frame) = front.read_frame() else {
            break StopReason::ReadFailed(CameraSide::Front);
        };
        let Some(back_frame) = back.read_frame() else {
            break StopReason::ReadFailed(CameraSide::Back);
        };

        write_fitted(front_out, &front_frame)?;
        write_fitted(back_out, &back_frame)?;
        pairs += 1;
    };

    let elapsed = started.elapsed();
    debug!("Session loop ended after {} frame pairs", pairs);
    info!(
        "⏹️ Recording stopped ({:?}) after {:.1}s, front {} / back {} frames",
        stop_reason,
        elapsed.as_secs_f32(),
        front_out.frames_written(),
        back_out.frames_written()
    );

    Ok(SessionReport {
        front_frames: front_out.frames_written(),
        back_frames: back_out.frames_written(),
        elapsed,
        stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::{MockCamera, MockClipWriter};

    fn limits(ms: u64) -> SessionLimits {
        SessionLimits {
            duration: Duration::from_millis(ms),
            grace: Duration::ZERO,
        }
    }

    #[test]
    fn test_stops_when_duration_elapses() {
        let mut front = MockCamera::endless("front").with_delay(Duration::from_millis(2));
        let mut back = MockCamera::endless("back");
        let mut front_out = MockClipWriter::new();
        let mut back_out = MockClipWriter::new();
        let cancel = AtomicBool::new(false);

        let report = record_pair(
            &mut front,
            &mut back,
            &mut front_out,
            &mut back_out,
            &limits(40),
            &cancel,
        )
        .unwrap();

        assert_eq!(report.stop_reason, StopReason::DurationElapsed);
        assert!(report.front_frames > 0);
        assert_eq!(report.front_frames, report.back_frames);
        assert!(report.elapsed >= Duration::from_millis(40));
    }

    #[test]
    fn test_stops_when_a_camera_fails() {
        let mut front = MockCamera::endless("front");
        let mut back = MockCamera::with_frames("back", 5);
        let mut front_out = MockClipWriter::new();
        let mut back_out = MockClipWriter::new();
        let cancel = AtomicBool::new(false);

        let report = record_pair(
            &mut front,
            &mut back,
            &mut front_out,
            &mut back_out,
            &limits(10_000),
            &cancel,
        )
        .unwrap();

        assert_eq!(report.stop_reason, StopReason::ReadFailed(CameraSide::Back));
        assert_eq!(report.front_frames, 5);
        assert_eq!(report.back_frames, 5);
    }

    #[test]
    fn test_front_failure_reported_first() {
        let mut front = MockCamera::with_frames("front", 0);
        let mut back = MockCamera::with_frames("back", 0);
        let mut front_out = MockClipWriter::new();
        let mut back_out = MockClipWriter::new();
        let cancel = AtomicBool::new(false);

        let report = record_pair(
            &mut front,
            &mut back,
            &mut front_out,
            &mut back_out,
            &limits(10_000),
            &cancel,
        )
        .unwrap();

        assert_eq!(report.stop_reason, StopReason::ReadFailed(CameraSide::Front));
        assert_eq!(report.front_frames, 0);
    }

    #[test]
    fn test_cancelled_before_first_frame() {
        let mut front = MockCamera::endless("front");
        let mut back = MockCamera::endless("back");
        let mut front_out = MockClipWriter::new();
        let mut back_out = MockClipWriter::new();
        let cancel = AtomicBool::new(true);

        let report = record_pair(
            &mut front,
            &mut back,
            &mut front_out,
            &mut back_out,
            &limits(10_000),
            &cancel,
        )
        .unwrap();

        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.front_frames, 0);
        assert_eq!(front.frames_read(), 0);
    }

    #[test]
    fn test_frames_resized_to_writer_size() {
        let mut front = MockCamera::with_frames("front", 2).with_size(8, 6);
        let mut back = MockCamera::with_frames("back", 2);
        let mut front_out = MockClipWriter::sized(4, 3);
        let mut back_out = MockClipWriter::sized(6, 4);
        let cancel = AtomicBool::new(false);

        let report = record_pair(
            &mut front,
            &mut back,
            &mut front_out,
            &mut back_out,
            &limits(10_000),
            &cancel,
        )
        .unwrap();

        assert_eq!(report.front_frames, 2);
        assert_eq!(report.back_frames, 2);
        assert_eq!(front_out.snapshot().last_size, Some((4, 3)));
        assert_eq!(back_out.snapshot().last_size, Some((6, 4)));
    }

    #[test]
    fn test_write_error_propagates() {
        let mut front = MockCamera::endless("front");
        let mut back = MockCamera::endless("back");
        let mut front_out = MockClipWriter::failing_after(3);
        let mut back_out = MockClipWriter::new();
        let cancel = AtomicBool::new(false);

        let result = record_pair(
            &mut front,
            &mut back,
            &mut front_out,
            &mut back_out,
            &limits(10_000),
            &cancel,
        );

        assert!(matches!(result, Err(CaptureError::Video(_))));
        assert_eq!(back_out.frames_written(), 3);
    }
}
