use super::error::VideoError;
use std::time::Duration;

/// 像素排列（每像素 3 字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    Bgr24,
}

impl PixelFormat {
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Bgr24 => "bgr24",
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        3
    }
}

/// 帧数据结构
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
    pub timestamp: Duration,
    pub frame_number: u64,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Self {
        Self {
            width,
            height,
            format,
            data,
            timestamp: Duration::from_millis(timestamp_ms),
            frame_number,
        }
    }

    /// Byte length of one packed frame.
    pub fn byte_len(width: u32, height: u32, format: PixelFormat) -> usize {
        width as usize * height as usize * format.bytes_per_pixel()
    }

    pub fn validate(&self) -> Result<(), VideoError> {
        let expected = Self::byte_len(self.width, self.height, self.format);
        if self.data.len() != expected {
            return Err(VideoError::FrameSize {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// RGB copy of this frame; the landmark model expects RGB input.
    pub fn to_rgb(&self) -> Frame {
        let data = match self.format {
            PixelFormat::Rgb24 => self.data.clone(),
            PixelFormat::Bgr24 => {
                let mut rgb = Vec::with_capacity(self.data.len());
                for chunk in self.data.chunks_exact(3) {
                    rgb.push(chunk[2]); // R
                    rgb.push(chunk[1]); // G
                    rgb.push(chunk[0]); // B
                }
                rgb
            }
        };

        Frame {
            width: self.width,
            height: self.height,
            format: PixelFormat::Rgb24,
            data,
            timestamp: self.timestamp,
            frame_number: self.frame_number,
        }
    }

    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Result<Frame, VideoError> {
        if self.width == target_width && self.height == target_height {
            return Ok(self.clone());
        }

        // Channel order is irrelevant to the resampler, so BGR goes through as-is.
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            VideoError::FrameSize {
                expected: Self::byte_len(self.width, self.height, self.format),
                actual: self.data.len(),
            },
        )?;
        let resized = image::imageops::resize(
            &img,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Ok(Frame {
            width: target_width,
            height: target_height,
            format: self.format,
            data: resized.into_raw(),
            timestamp: self.timestamp,
            frame_number: self.frame_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100 * 3];
        let frame = Frame::new(100, 100, PixelFormat::Rgb24, data, 1000, 30);

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.timestamp.as_millis(), 1000);
        assert_eq!(frame.frame_number, 30);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_bgr_to_rgb_swaps_channels() {
        let frame = Frame::new(2, 1, PixelFormat::Bgr24, vec![1, 2, 3, 4, 5, 6], 0, 0);
        let rgb = frame.to_rgb();

        assert_eq!(rgb.format, PixelFormat::Rgb24);
        assert_eq!(rgb.data, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_rgb_to_rgb_is_copy() {
        let frame = Frame::new(1, 1, PixelFormat::Rgb24, vec![10, 20, 30], 0, 0);
        assert_eq!(frame.to_rgb().data, vec![10, 20, 30]);
    }

    #[test]
    fn test_frame_resize() {
        let data = vec![200u8; 100 * 80 * 3];
        let frame = Frame::new(100, 80, PixelFormat::Rgb24, data, 0, 0);
        let resized = frame.resize_to(64, 48).unwrap();

        assert_eq!(resized.width, 64);
        assert_eq!(resized.height, 48);
        assert_eq!(resized.data.len(), 64 * 48 * 3);
        assert!(resized.data.iter().all(|&v| v == 200));
    }

    #[test]
    fn test_resize_rejects_short_buffer() {
        let frame = Frame::new(10, 10, PixelFormat::Rgb24, vec![0u8; 12], 0, 0);
        assert!(matches!(
            frame.resize_to(5, 5),
            Err(VideoError::FrameSize { expected: 300, actual: 12 })
        ));
        assert!(frame.validate().is_err());
    }
}
