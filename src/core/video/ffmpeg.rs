//! FFmpeg 子进程辅助函数

use super::error::VideoError;
use serde::Deserialize;
#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};

/// Executable names or paths for the ffmpeg tool pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FfmpegTools {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl FfmpegTools {
    pub fn ffmpeg_command(&self) -> Command {
        quiet_command(&self.ffmpeg)
    }

    pub fn ffprobe_command(&self) -> Command {
        quiet_command(&self.ffprobe)
    }
}

fn quiet_command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    // CREATE_NO_WINDOW
    #[cfg(target_os = "windows")]
    cmd.creation_flags(0x08000000);
    cmd.stdin(Stdio::null());
    cmd
}

/// Returns the first line of `ffmpeg -version`.
pub fn check_ffmpeg(tools: &FfmpegTools) -> Result<String, VideoError> {
    let output = tools
        .ffmpeg_command()
        .arg("-version")
        .output()
        .map_err(|e| VideoError::FfmpegMissing(format!("{}: {}", tools.ffmpeg, e)))?;

    if !output.status.success() {
        return Err(VideoError::FfmpegMissing(format!(
            "{} exited with {}",
            tools.ffmpeg, output.status
        )));
    }

    let version = String::from_utf8_lossy(&output.stdout);
    Ok(version.lines().next().unwrap_or("FFmpeg installed").to_string())
}

/// Parses an ffprobe rate such as `30000/1001` or `25`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}
