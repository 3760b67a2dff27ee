use super::issues::Issue;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Pitch,
    Rhythm,
    Dynamics,
    Hand,
}

impl Axis {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pitch => "Pitch",
            Self::Rhythm => "Rhythm",
            Self::Dynamics => "Dynamics",
            Self::Hand => "Hand",
        }
    }
}

// --- AUDIO MEASUREMENTS ---

/// One frame of the fundamental-frequency trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchFrame {
    pub time: f64,
    #[serde(default)]
    pub frequency: Option<f64>,
    pub voiced: bool,
}

impl PitchFrame {
    pub fn voiced(time: f64, frequency: f64) -> Self {
        Self {
            time,
            frequency: Some(frequency),
            voiced: true,
        }
    }

    pub fn unvoiced(time: f64) -> Self {
        Self {
            time,
            frequency: None,
            voiced: false,
        }
    }
}

/// A voiced frame as shown on the pitch curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSample {
    pub time: f64,
    pub frequency: f64,
    pub note: String,
    pub cents_off: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatPoint {
    pub time: f64,
}

/// Onset detector output plus the tempo estimated from the same onsets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnsetTrack {
    pub onsets: Vec<f64>,
    #[serde(default)]
    pub tempo_bpm: f64,
}

/// Axis-specific series attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "points", rename_all = "lowercase")]
pub enum AxisSeries {
    Curve(Vec<PitchSample>),
    Beats(Vec<BeatPoint>),
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisResult {
    pub score: u8,
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub series: AxisSeries,
}

impl AxisResult {
    pub fn new(score: u8, issues: Vec<Issue>, series: AxisSeries) -> Self {
        Self {
            score,
            issues,
            series,
        }
    }

    pub fn curve(&self) -> &[PitchSample] {
        match &self.series {
            AxisSeries::Curve(points) => points,
            _ => &[],
        }
    }

    pub fn beats(&self) -> &[BeatPoint] {
        match &self.series {
            AxisSeries::Beats(points) => points,
            _ => &[],
        }
    }
}

// --- HAND MEASUREMENTS ---

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Natural DIP bend range in degrees.
    pub fn ideal_range(&self) -> (f64, f64) {
        match self {
            Self::Thumb => (130.0, 160.0),
            _ => (140.0, 170.0),
        }
    }

    /// Landmark indices of [tip, dip, pip] in the 21-point hand model.
    pub fn joint_indices(&self) -> [usize; 3] {
        match self {
            Self::Thumb => [4, 3, 2],
            Self::Index => [8, 7, 6],
            Self::Middle => [12, 11, 10],
            Self::Ring => [16, 15, 14],
            Self::Pinky => [20, 19, 18],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Thumb => "Thumb",
            Self::Index => "Index finger",
            Self::Middle => "Middle finger",
            Self::Ring => "Ring finger",
            Self::Pinky => "Pinky",
        }
    }
}

/// Bend angle per finger for one detected hand. Absent fingers are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FingerAngleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinky: Option<f64>,
}

impl FingerAngleRecord {
    pub fn get(&self, finger: Finger) -> Option<f64> {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn set(&mut self, finger: Finger, angle: f64) {
        let slot = match finger {
            Finger::Thumb => &mut self.thumb,
            Finger::Index => &mut self.index,
            Finger::Middle => &mut self.middle,
            Finger::Ring => &mut self.ring,
            Finger::Pinky => &mut self.pinky,
        };
        *slot = Some(angle);
    }

    pub fn is_empty(&self) -> bool {
        Finger::iter().all(|f| self.get(f).is_none())
    }

    pub fn with(mut self, finger: Finger, angle: f64) -> Self {
        self.set(finger, angle);
        self
    }

    pub fn uniform(angle: f64) -> Self {
        Self {
            thumb: Some(angle),
            index: Some(angle),
            middle: Some(angle),
            ring: Some(angle),
            pinky: Some(angle),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One hand found in one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectedHand {
    #[serde(default)]
    pub hand: Handedness,
    #[serde(default)]
    pub angles: FingerAngleRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,
}

/// Everything the hand detector reported for one analysable frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetections {
    pub frame_index: usize,
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

/// Hand detector output for a whole recording. `total_frames` counts every
/// extracted frame, including those where detection found nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandTrack {
    pub total_frames: usize,
    #[serde(default)]
    pub frames: Vec<FrameDetections>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandSnapshot {
    pub frame_index: usize,
    pub hand: Handedness,
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandAnalysisResult {
    pub hand_detected: bool,
    pub frame_count: usize,
    pub detected_frames: usize,
    pub overall_score: u8,
    #[serde(default)]
    pub finger_averages: FingerAngleRecord,
    pub issues: Vec<Issue>,
    pub hand_points: Vec<HandSnapshot>,
}

impl HandAnalysisResult {
    /// A result that carries a single issue and no measurements.
    pub fn empty(frame_count: usize, issue: Issue) -> Self {
        Self {
            hand_detected: false,
            frame_count,
            detected_frames: 0,
            overall_score: 0,
            finger_averages: FingerAngleRecord::default(),
            issues: vec![issue],
            hand_points: Vec::new(),
        }
    }
}

// --- REPORTS ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioReport {
    pub pitch: AxisResult,
    pub rhythm: AxisResult,
    pub dynamics: AxisResult,
    pub audio_score: u8,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub pitch: AxisResult,
    pub rhythm: AxisResult,
    pub dynamics: AxisResult,
    pub hand: HandAnalysisResult,
    pub audio_score: u8,
    pub overall_score: u8,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}
