//! minifb 窗口：绘制按钮网格与状态栏，轮询鼠标 / 键盘

use super::app::CaptureApp;
use super::board::ButtonState;
use super::font::{draw_text, text_width, GLYPH_H};
use super::grid::{button_rect, centered_position, hit_test, status_origin, window_size, Rect};
use crate::core::Label;
use log::info;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;

const BG_COLOR: u32 = 0xFF000000;
const BUTTON_COLOR: u32 = 0xFF00A000;
const PENDING_COLOR: u32 = 0xFFC8A000;
const RECORDING_COLOR: u32 = 0xFFC03030;
const LABEL_COLOR: u32 = 0xFF000000;
const STATUS_COLOR: u32 = 0xFF00E000;
const LABEL_SCALE: usize = 4;
const STATUS_SCALE: usize = 2;

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("Window error: {0}")]
    Window(#[from] minifb::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Screen size used to center the window
    pub screen_width: usize,
    pub screen_height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Video Recorder App".to_string(),
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

fn fill_rect(buf: &mut [u32], width: usize, rect: Rect, color: u32) {
    let height = buf.len() / width;
    for row in rect.y..(rect.y + rect.h).min(height) {
        for col in rect.x..(rect.x + rect.w).min(width) {
            buf[row * width + col] = color;
        }
    }
}

fn button_color(state: ButtonState) -> u32 {
    match state {
        ButtonState::Idle => BUTTON_COLOR,
        ButtonState::Pending { .. } => PENDING_COLOR,
        ButtonState::Recording => RECORDING_COLOR,
    }
}

fn render(buf: &mut [u32], width: usize, app: &CaptureApp) {
    buf.fill(BG_COLOR);

    for (i, &label) in Label::all().iter().enumerate() {
        let rect = button_rect(i);
        fill_rect(buf, width, rect, button_color(app.button_state(label)));

        let text = label.to_string();
        let tx = rect.x + (rect.w - text_width(&text, LABEL_SCALE)) / 2;
        let ty = rect.y + (rect.h - GLYPH_H * LABEL_SCALE) / 2;
        draw_text(buf, width, &text, tx, ty, LABEL_SCALE, LABEL_COLOR);
    }

    let (sx, sy) = status_origin();
    draw_text(buf, width, app.status(), sx, sy, STATUS_SCALE, STATUS_COLOR);
}

/// Runs the capture window until it is closed or `Esc` is pressed.
pub fn run(mut app: CaptureApp, config: &WindowConfig) -> Result<(), GuiError> {
    let (width, height) = window_size();
    let mut window = Window::new(
        &config.title,
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )?;
    let (x, y) = centered_position((config.screen_width, config.screen_height), (width, height));
    window.set_position(x, y);
    window.limit_update_rate(Some(Duration::from_millis(16)));

    let mut buf = vec![BG_COLOR; width * height];
    let mut was_down = false;
    info!("🪟 Capture window open ({}x{})", width, height);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();

        // Act on the press edge only
        let down = window.get_mouse_down(MouseButton::Left);
        if down && !was_down {
            if let Some(label) = window
                .get_mouse_pos(MouseMode::Discard)
                .and_then(|(mx, my)| hit_test(mx, my))
            {
                app.click(label, now);
            }
        }
        was_down = down;

        if window.is_key_pressed(Key::Q, KeyRepeat::No) {
            app.cancel();
        }

        app.tick(now);
        render(&mut buf, width, &app);
        window.update_with_buffer(&buf, width, height)?;
    }

    info!("👋 Capture window closed");
    app.shutdown();
    Ok(())
}
