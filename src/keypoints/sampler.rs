/// Frame index to decode for one sampled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePoint {
    /// 0-based position among the sampled frames
    pub ordinal: usize,
    /// Frame index in the clip
    pub frame_index: u64,
}

/// `max(total_frames / target, 1)`.
pub fn frame_stride(total_frames: u64, target: usize) -> u64 {
    if target == 0 {
        return 1;
    }
    (total_frames / target as u64).max(1)
}

/// Yields `target` evenly strided frame indices starting at frame 0.
///
/// Indices are not clamped to `total_frames`: for short clips the trailing
/// indices point past the end and the decoder reports end of stream.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    stride: u64,
    target: usize,
    next: usize,
}

impl FrameSampler {
    pub fn new(total_frames: u64, target: usize) -> Self {
        Self {
            stride: frame_stride(total_frames, target),
            target,
            next: 0,
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl Iterator for FrameSampler {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.next >= self.target {
            return None;
        }
        let point = SamplePoint {
            ordinal: self.next,
            frame_index: self.next as u64 * self.stride,
        };
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.target - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FrameSampler {}

pub fn sample_points(total_frames: u64, target: usize) -> FrameSampler {
    FrameSampler::new(total_frames, target)
}
