//! 按钮状态：空闲 → 等待（倒计时）→ 录制中 → 空闲

use crate::core::Label;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    /// Capture starts at `due`
    Pending { due: Instant },
    /// Request sent to the recorder, waiting for its reply
    Recording,
}

impl ButtonState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ButtonState::Idle)
    }
}

/// One state per label, in `Label::all()` order.
pub struct ButtonBoard {
    states: Vec<ButtonState>,
    delay: Duration,
}

impl ButtonBoard {
    pub fn new(delay: Duration) -> Self {
        Self {
            states: vec![ButtonState::Idle; Label::all().len()],
            delay,
        }
    }

    pub fn state(&self, label: Label) -> ButtonState {
        self.states[label.index()]
    }

    /// Disables the button and schedules its capture. Ignored unless idle.
    pub fn press(&mut self, label: Label, now: Instant) -> bool {
        let state = &mut self.states[label.index()];
        if !state.is_enabled() {
            return false;
        }
        *state = ButtonState::Pending {
            due: now + self.delay,
        };
        true
    }

    /// Labels whose delay has elapsed; they move to `Recording`.
    pub fn take_due(&mut self, now: Instant) -> Vec<Label> {
        let mut due_labels = Vec::new();
        for (state, &label) in self.states.iter_mut().zip(Label::all()) {
            if let ButtonState::Pending { due } = *state {
                if due <= now {
                    *state = ButtonState::Recording;
                    due_labels.push(label);
                }
            }
        }
        due_labels
    }

    /// Re-enables the button whatever the capture outcome.
    pub fn complete(&mut self, label: Label) {
        self.states[label.index()] = ButtonState::Idle;
    }

    /// Time left on the earliest pending countdown.
    pub fn next_countdown(&self, now: Instant) -> Option<(Label, Duration)> {
        self.states
            .iter()
            .zip(Label::all())
            .filter_map(|(state, &label)| match *state {
                ButtonState::Pending { due } => Some((label, due.saturating_duration_since(now))),
                _ => None,
            })
            .min_by_key(|(_, left)| *left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(c: char) -> Label {
        Label::new(c).unwrap()
    }

    #[test]
    fn test_press_schedules_after_delay() {
        let mut board = ButtonBoard::new(Duration::from_secs(3));
        let t0 = Instant::now();

        assert!(board.press(label('a'), t0));
        assert_eq!(
            board.state(label('a')),
            ButtonState::Pending {
                due: t0 + Duration::from_secs(3)
            }
        );

        assert!(board.take_due(t0 + Duration::from_secs(2)).is_empty());
        assert_eq!(board.take_due(t0 + Duration::from_secs(3)), vec![label('a')]);
        assert_eq!(board.state(label('a')), ButtonState::Recording);
        assert!(board.take_due(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_disabled_button_ignores_press() {
        let mut board = ButtonBoard::new(Duration::from_secs(3));
        let t0 = Instant::now();

        assert!(board.press(label('Q'), t0));
        assert!(!board.press(label('Q'), t0 + Duration::from_secs(1)));
        board.take_due(t0 + Duration::from_secs(3));
        assert!(!board.press(label('Q'), t0 + Duration::from_secs(4)));

        board.complete(label('Q'));
        assert!(board.state(label('Q')).is_enabled());
        assert!(board.press(label('Q'), t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_buttons_are_independent() {
        let mut board = ButtonBoard::new(Duration::from_millis(100));
        let t0 = Instant::now();
        board.press(label('0'), t0);
        board.press(label('z'), t0 + Duration::from_millis(50));

        assert!(!board.state(label('0')).is_enabled());
        assert_eq!(board.next_countdown(t0).map(|(l, _)| l), Some(label('0')));
        assert_eq!(board.take_due(t0 + Duration::from_millis(120)), vec![label('0')]);
        assert!(!board.state(label('z')).is_enabled());
        assert_eq!(board.take_due(t0 + Duration::from_millis(150)), vec![label('z')]);
    }
}
