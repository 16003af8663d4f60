//! MediaPipe 手部关键点 - 通过 Python 子进程调用
//!
//! 协议（每帧一次往返）：
//! - 请求：width, height, channels（各 u32 小端）+ RGB 原始字节
//! - 响应：一行 JSON `{"hands": [...], "error": null}`
//!
//! 子进程启动完成后输出一行 `READY`。

use super::error::LandmarkError;
use super::landmarker::{HandLandmarker, HandLandmarks, Landmark, LANDMARKS_PER_HAND};
use crate::core::video::{Frame, PixelFormat};
use log::{debug, info, warn};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LandmarkerConfig {
    pub python: String,
    pub script: PathBuf,
    pub max_hands: usize,
    pub min_detection_confidence: f32,
}

impl Default for LandmarkerConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            script: PathBuf::from("scripts/hand_landmarks.py"),
            max_hands: 2,
            min_detection_confidence: 0.5,
        }
    }
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    #[serde(default)]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parses one response line. Hands without exactly 21 landmarks are skipped.
pub fn parse_response(line: &str) -> Result<Vec<HandLandmarks>, LandmarkError> {
    let result: DetectionResult = serde_json::from_str(line.trim())?;
    if let Some(error) = result.error {
        return Err(LandmarkError::Sidecar(error));
    }

    let mut hands = Vec::with_capacity(result.hands.len());
    for hand in result.hands {
        if hand.landmarks.len() != LANDMARKS_PER_HAND {
            warn!(
                "⚠️ Expected {} landmarks, got {}",
                LANDMARKS_PER_HAND,
                hand.landmarks.len()
            );
            continue;
        }

        let mut landmarks = [Landmark::default(); LANDMARKS_PER_HAND];
        for (dst, src) in landmarks.iter_mut().zip(&hand.landmarks) {
            *dst = Landmark {
                x: src.x,
                y: src.y,
                z: src.z,
            };
        }
        hands.push(HandLandmarks {
            landmarks,
            score: hand.score,
            handedness: hand.handedness,
        });
    }
    Ok(hands)
}

/// Hand landmarker backed by a long-lived Python process running MediaPipe
/// Hands in video mode.
pub struct MediaPipeLandmarker {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl MediaPipeLandmarker {
    pub fn new(config: &LandmarkerConfig) -> Result<Self, LandmarkError> {
        if !config.script.is_file() {
            return Err(LandmarkError::Startup(format!(
                "script not found at {}",
                config.script.display()
            )));
        }

        info!("🖐️ Starting MediaPipe sidecar: {}", config.script.display());
        let mut process = Command::new(&config.python)
            .arg(&config.script)
            .arg("--max-hands")
            .arg(config.max_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| LandmarkError::Startup(format!("{}: {}", config.python, e)))?;

        let (stdin, stdout) = match (process.stdin.take(), process.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = process.kill();
                return Err(LandmarkError::Startup("pipes unavailable".to_string()));
            }
        };
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready)?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            return Err(LandmarkError::Startup(format!(
                "sidecar did not signal ready, got '{}'",
                ready.trim()
            )));
        }

        info!("✅ MediaPipe sidecar ready");
        Ok(Self {
            process,
            stdin,
            stdout,
        })
    }
}

impl HandLandmarker for MediaPipeLandmarker {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>, LandmarkError> {
        let rgb;
        let frame = if frame.format == PixelFormat::Rgb24 {
            frame
        } else {
            rgb = frame.to_rgb();
            &rgb
        };

        let channels = frame.format.bytes_per_pixel() as u32;
        self.stdin.write_all(&frame.width.to_le_bytes())?;
        self.stdin.write_all(&frame.height.to_le_bytes())?;
        self.stdin.write_all(&channels.to_le_bytes())?;
        self.stdin.write_all(&frame.data)?;
        self.stdin.flush()?;

        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(LandmarkError::SidecarExited);
        }

        let hands = parse_response(&line)?;
        debug!("Frame {}: {} hand(s)", frame.frame_number, hands.len());
        Ok(hands)
    }
}

impl Drop for MediaPipeLandmarker {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
        info!("🗑️ MediaPipe sidecar stopped");
    }
}
