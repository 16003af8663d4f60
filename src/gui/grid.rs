//! 按钮网格布局（纯计算，不依赖窗口）
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  [a] [b] [c] [d] [e] [f] [g] [h] [i] [j]  │
//! │  ...                                     │
//! │  [8] [9]                                 │
//! │  status line                             │
//! └──────────────────────────────────────────┘
//! ```

use crate::core::Label;

pub const COLUMNS: usize = 10;
pub const BUTTON_W: usize = 56;
pub const BUTTON_H: usize = 40;
pub const GAP: usize = 10;
pub const PADDING: usize = 20;
pub const STATUS_H: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn contains(&self, px: usize, py: usize) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

pub fn rows() -> usize {
    Label::all().len().div_ceil(COLUMNS)
}

pub fn window_size() -> (usize, usize) {
    let w = PADDING * 2 + COLUMNS * BUTTON_W + (COLUMNS - 1) * GAP;
    let h = PADDING * 2 + rows() * BUTTON_H + (rows() - 1) * GAP + STATUS_H;
    (w, h)
}

/// Button `index` sits at row `index / 10`, column `index % 10`.
pub fn button_rect(index: usize) -> Rect {
    let row = index / COLUMNS;
    let col = index % COLUMNS;
    Rect {
        x: PADDING + col * (BUTTON_W + GAP),
        y: PADDING + row * (BUTTON_H + GAP),
        w: BUTTON_W,
        h: BUTTON_H,
    }
}

/// Top-left of the status line, one gap below the last button row.
pub fn status_origin() -> (usize, usize) {
    (PADDING, PADDING + rows() * (BUTTON_H + GAP))
}

/// Label under the window-relative point, if any.
pub fn hit_test(x: f32, y: f32) -> Option<Label> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let (px, py) = (x as usize, y as usize);
    Label::all()
        .iter()
        .enumerate()
        .find(|(i, _)| button_rect(*i).contains(px, py))
        .map(|(_, &label)| label)
}

/// Top-left corner that centers a `window` on a `screen`.
pub fn centered_position(screen: (usize, usize), window: (usize, usize)) -> (isize, isize) {
    let x = (screen.0 as isize - window.0 as isize) / 2;
    let y = (screen.1 as isize - window.1 as isize) / 2;
    (x.max(0), y.max(0))
}
