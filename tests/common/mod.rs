#![allow(dead_code)]

use perfscore::scorer::types::{DetectedHand, Handedness, Landmark};
use perfscore::scorer::{FingerAngleRecord, FrameDetections, HandTrack, PitchFrame};

/// Equal-tempered frequency `semitones` away from A4.
pub fn semitone(semitones: i32) -> f64 {
    440.0 * 2f64.powf(f64::from(semitones) / 12.0)
}

/// Frequency `cents` above the given semitone.
pub fn detuned(semitones: i32, cents: f64) -> f64 {
    semitone(semitones) * 2f64.powf(cents / 1200.0)
}

/// Voiced frames 10 ms apart.
pub fn voiced_trace(frequencies: &[f64]) -> Vec<PitchFrame> {
    frequencies
        .iter()
        .enumerate()
        .map(|(i, &f)| PitchFrame::voiced(i as f64 * 0.01, f))
        .collect()
}

/// Every finger laid out along +x, so each DIP angle is 180°.
pub fn straight_landmarks() -> Vec<Landmark> {
    (0..21).map(|i| Landmark::new(i as f64, 0.0, 0.0)).collect()
}

/// Builder for a hand track, one hand per detected frame.
pub struct TrackBuilder {
    track: HandTrack,
}

impl TrackBuilder {
    pub fn new(total_frames: usize) -> Self {
        Self {
            track: HandTrack {
                total_frames,
                frames: Vec::new(),
            },
        }
    }

    pub fn angles(mut self, frame_index: usize, angles: FingerAngleRecord) -> Self {
        self.track.frames.push(FrameDetections {
            frame_index,
            hands: vec![DetectedHand::from_angles(Handedness::Right, angles)],
        });
        self
    }

    pub fn landmarks(mut self, frame_index: usize, landmarks: Vec<Landmark>) -> Self {
        self.track.frames.push(FrameDetections {
            frame_index,
            hands: vec![DetectedHand {
                hand: Handedness::Left,
                angles: FingerAngleRecord::default(),
                landmarks,
            }],
        });
        self
    }

    pub fn empty_frame(mut self, frame_index: usize) -> Self {
        self.track.frames.push(FrameDetections {
            frame_index,
            hands: Vec::new(),
        });
        self
    }

    pub fn build(self) -> HandTrack {
        self.track
    }
}
