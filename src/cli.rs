//! 命令行共用的小工具

use crate::core::CameraSide;
use std::io::{self, Write};

pub const CAMERA_PROMPT: &str = "Choose camera (1 = front, 2 = back): ";

pub fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}

/// Camera from the command-line argument, or from stdin when absent.
/// `None` after printing a message when the choice is invalid.
pub fn resolve_camera(arg: Option<String>) -> Option<CameraSide> {
    let choice = arg.unwrap_or_else(|| read_line(CAMERA_PROMPT));
    let side = CameraSide::from_choice(&choice);
    if side.is_none() {
        println!("Invalid camera choice '{}'. Use 1/front or 2/back.", choice.trim());
    }
    side
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_skips_prompt() {
        assert_eq!(resolve_camera(Some("1".into())), Some(CameraSide::Front));
        assert_eq!(resolve_camera(Some("back".into())), Some(CameraSide::Back));
        assert_eq!(resolve_camera(Some("3".into())), None);
    }
}
