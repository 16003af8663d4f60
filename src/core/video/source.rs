//! 片段解码 - 按帧号定位并解码单帧

use super::error::VideoError;
use super::ffmpeg::{parse_frame_rate, FfmpegTools};
use super::frame::{Frame, PixelFormat};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

pub trait VideoSource {
    /// Total frame count as reported by the container.
    fn frame_count(&self) -> u64;

    /// Nominal frames per second.
    fn frame_rate(&self) -> f64;

    /// Seeks to `index` and decodes that frame.
    ///
    /// `Ok(None)` means the frame could not be decoded (end of stream or a
    /// decode failure); callers treat it as the end of the clip.
    fn read_frame_at(&mut self, index: u64) -> Result<Option<Frame>, VideoError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub frame_count: u64,
    pub frame_rate: f64,
}

#[derive(Debug, Deserialize)]
struct StreamListing {
    #[serde(default)]
    streams: Vec<StreamEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    nb_read_packets: Option<String>,
}

/// Parses `ffprobe -of json` stream output for the first video stream.
pub fn parse_stream_info(path: &str, json: &str) -> Result<StreamInfo, VideoError> {
    let output: StreamListing = serde_json::from_str(json)?;
    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| VideoError::NoVideoStream(path.to_string()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(VideoError::NoVideoStream(path.to_string())),
    };

    let frame_count = [&stream.nb_frames, &stream.nb_read_packets]
        .into_iter()
        .flatten()
        .find_map(|n| n.trim().parse::<u64>().ok().filter(|&n| n > 0))
        .unwrap_or(0);

    let frame_rate = [&stream.avg_frame_rate, &stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|r| parse_frame_rate(r))
        .unwrap_or(0.0);

    Ok(StreamInfo {
        width,
        height,
        frame_count,
        frame_rate,
    })
}

/// ffmpeg arguments placed before and after `-i` to decode frame `index`.
///
/// With a known frame rate the input is seeked to half a frame before
/// `index`; ffmpeg then decodes from the preceding keyframe only. Without
/// one, a `select` filter counts frames from the start of the clip.
fn frame_selection(index: u64, frame_rate: f64) -> (Vec<String>, Vec<String>) {
    if frame_rate > 0.0 {
        let seconds = (index as f64 - 0.5).max(0.0) / frame_rate;
        (vec!["-ss".to_string(), format!("{:.6}", seconds)], Vec::new())
    } else {
        (
            Vec::new(),
            vec![
                "-vf".to_string(),
                format!("select=eq(n\\,{})", index),
                "-vsync".to_string(),
                "0".to_string(),
            ],
        )
    }
}

/// Decodes single frames of a clip, one ffmpeg process per frame.
pub struct FfmpegVideoSource {
    path: PathBuf,
    tools: FfmpegTools,
    info: StreamInfo,
    format: PixelFormat,
}

impl FfmpegVideoSource {
    pub fn open(path: &Path, tools: &FfmpegTools) -> Result<Self, VideoError> {
        Self::open_with_format(path, tools, PixelFormat::Bgr24)
    }

    pub fn open_with_format(
        path: &Path,
        tools: &FfmpegTools,
        format: PixelFormat,
    ) -> Result<Self, VideoError> {
        let path_str = path.to_string_lossy().to_string();
        let output = tools
            .ffprobe_command()
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-count_packets",
                "-show_entries",
                "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames,nb_read_packets",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| VideoError::FfmpegMissing(format!("{}: {}", tools.ffprobe, e)))?;

        if !output.status.success() {
            return Err(VideoError::Inspect {
                path: path_str,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let info = parse_stream_info(&path_str, &String::from_utf8_lossy(&output.stdout))?;
        info!(
            "🎞️ Opened {}: {}x{}, {} frames @ {:.2} fps",
            path_str, info.width, info.height, info.frame_count, info.frame_rate
        );

        Ok(Self {
            path: path.to_path_buf(),
            tools: tools.clone(),
            info,
            format,
        })
    }
}

impl VideoSource for FfmpegVideoSource {
    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn frame_rate(&self) -> f64 {
        self.info.frame_rate
    }

    fn read_frame_at(&mut self, index: u64) -> Result<Option<Frame>, VideoError> {
        let (input_args, output_args) = frame_selection(index, self.info.frame_rate);
        let output = self
            .tools
            .ffmpeg_command()
            .args(["-v", "error"])
            .args(&input_args)
            .arg("-i")
            .arg(&self.path)
            .args(&output_args)
            .args([
                "-frames:v",
                "1",
                "-f",
                "rawvideo",
                "-pix_fmt",
                self.format.ffmpeg_name(),
                "pipe:1",
            ])
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| VideoError::FfmpegMissing(format!("{}: {}", self.tools.ffmpeg, e)))?;

        let expected = Frame::byte_len(self.info.width, self.info.height, self.format);
        if !output.status.success() || output.stdout.len() < expected {
            debug!(
                "Frame {} of {} not decoded ({} of {} bytes): {}",
                index,
                self.path.display(),
                output.stdout.len(),
                expected,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        let mut data = output.stdout;
        data.truncate(expected);
        let timestamp_ms = if self.info.frame_rate > 0.0 {
            (index as f64 * 1000.0 / self.info.frame_rate) as u64
        } else {
            0
        };

        Ok(Some(Frame::new(
            self.info.width,
            self.info.height,
            self.format,
            data,
            timestamp_ms,
            index,
        )))
    }
}

/// In-memory clip: uniform frames, fails to decode past `frame_count`
/// (or past `decodable` when set, to mimic a truncated stream).
pub struct MockVideoSource {
    frame_count: u64,
    frame_rate: f64,
    decodable: Option<u64>,
    width: u32,
    height: u32,
    reads: HashMap<u64, usize>,
    read_order: Vec<u64>,
}

impl MockVideoSource {
    pub fn new(frame_count: u64, frame_rate: f64) -> Self {
        Self {
            frame_count,
            frame_rate,
            decodable: None,
            width: 8,
            height: 6,
            reads: HashMap::new(),
            read_order: Vec::new(),
        }
    }

    /// Frames at or beyond `limit` fail to decode.
    pub fn with_decodable_frames(mut self, limit: u64) -> Self {
        self.decodable = Some(limit);
        self
    }

    /// Indices requested so far, in request order.
    pub fn read_order(&self) -> &[u64] {
        &self.read_order
    }

    pub fn read_count(&self, index: u64) -> usize {
        self.reads.get(&index).copied().unwrap_or(0)
    }
}

impl VideoSource for MockVideoSource {
    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn read_frame_at(&mut self, index: u64) -> Result<Option<Frame>, VideoError> {
        *self.reads.entry(index).or_insert(0) += 1;
        self.read_order.push(index);

        let limit = self.decodable.unwrap_or(self.frame_count).min(self.frame_count);
        if index >= limit {
            return Ok(None);
        }

        let data = vec![(index % 256) as u8; Frame::byte_len(self.width, self.height, PixelFormat::Bgr24)];
        Ok(Some(Frame::new(
            self.width,
            self.height,
            PixelFormat::Bgr24,
            data,
            0,
            index,
        )))
    }
}
