use super::error::LandmarkError;
use crate::core::video::Frame;
use ndarray::Array2;

pub const LANDMARKS_PER_HAND: usize = 21;
pub const KEYPOINTS_PER_HAND: usize = LANDMARKS_PER_HAND * 3;

/// A single hand landmark in the model's normalized space
/// (x, y in `[0, 1]` of the image, z relative to the wrist).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; LANDMARKS_PER_HAND],
    pub score: f32,
    /// "Left" or "Right"
    pub handedness: String,
}

impl HandLandmarks {
    /// `[x0, y0, z0, x1, y1, z1, ...]`
    pub fn flatten(&self) -> [f64; KEYPOINTS_PER_HAND] {
        let mut out = [0.0; KEYPOINTS_PER_HAND];
        for (i, lm) in self.landmarks.iter().enumerate() {
            out[i * 3] = lm.x;
            out[i * 3 + 1] = lm.y;
            out[i * 3 + 2] = lm.z;
        }
        out
    }
}

pub trait HandLandmarker {
    /// Detects hands in an RGB frame.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>, LandmarkError>;
}

/// One 63-value row per hand, at most `max_hands` rows, in detection order.
/// No hands gives a `(0, 63)` array.
pub fn keypoint_records(hands: &[HandLandmarks], max_hands: usize) -> Array2<f64> {
    let kept = hands.len().min(max_hands);
    let mut records = Array2::<f64>::zeros((kept, KEYPOINTS_PER_HAND));
    for (mut row, hand) in records.rows_mut().into_iter().zip(hands) {
        for (dst, src) in row.iter_mut().zip(hand.flatten()) {
            *dst = src;
        }
    }
    records
}

/// Synthetic hands for tests; the number of hands can depend on the frame number.
pub struct MockHandLandmarker {
    hands_for_frame: Box<dyn Fn(u64) -> usize + Send>,
    calls: Vec<u64>,
}

impl MockHandLandmarker {
    pub fn with_hand_count(count: usize) -> Self {
        Self::with_pattern(move |_| count)
    }

    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(u64) -> usize + Send + 'static,
    {
        Self {
            hands_for_frame: Box::new(pattern),
            calls: Vec::new(),
        }
    }

    /// Frame numbers seen so far.
    pub fn calls(&self) -> &[u64] {
        &self.calls
    }

    /// Landmark `i` of hand `h` on frame `n` sits at `(n, h, i)` scaled down.
    pub fn synthetic_hand(frame_number: u64, hand: usize) -> HandLandmarks {
        let mut landmarks = [Landmark::default(); LANDMARKS_PER_HAND];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            *lm = Landmark {
                x: frame_number as f64 / 1000.0,
                y: hand as f64 / 10.0,
                z: i as f64 / 100.0,
            };
        }
        HandLandmarks {
            landmarks,
            score: 0.9,
            handedness: if hand % 2 == 0 { "Right" } else { "Left" }.to_string(),
        }
    }
}

impl HandLandmarker for MockHandLandmarker {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>, LandmarkError> {
        self.calls.push(frame.frame_number);
        let count = (self.hands_for_frame)(frame.frame_number);
        Ok((0..count)
            .map(|h| Self::synthetic_hand(frame.frame_number, h))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_order() {
        let hand = MockHandLandmarker::synthetic_hand(500, 1);
        let flat = hand.flatten();

        assert_eq!(flat.len(), 63);
        assert_eq!(flat[0], 0.5);
        assert_eq!(flat[1], 0.1);
        assert_eq!(flat[2], 0.0);
        assert_eq!(flat[62], 0.2);
    }

    #[test]
    fn test_zero_hands_gives_empty_rows() {
        let records = keypoint_records(&[], 2);
        assert_eq!(records.shape(), &[0, 63]);
    }

    #[test]
    fn test_two_hands_gives_two_rows() {
        let hands = vec![
            MockHandLandmarker::synthetic_hand(3, 0),
            MockHandLandmarker::synthetic_hand(3, 1),
        ];
        let records = keypoint_records(&hands, 2);

        assert_eq!(records.shape(), &[2, 63]);
        assert_eq!(records.row(0).to_vec(), hands[0].flatten().to_vec());
        assert_eq!(records.row(1).to_vec(), hands[1].flatten().to_vec());
    }

    #[test]
    fn test_extra_hands_dropped() {
        let hands: Vec<HandLandmarks> = (0..3)
            .map(|h| MockHandLandmarker::synthetic_hand(0, h))
            .collect();
        assert_eq!(keypoint_records(&hands, 2).nrows(), 2);
    }
}
