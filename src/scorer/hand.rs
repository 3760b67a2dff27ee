use super::issues::{Issue, IssueKind};
use super::stats::{clamp_score, mean, round_to};
use super::types::{
    DetectedHand, Finger, FingerAngleRecord, FrameDetections, HandAnalysisResult, HandSnapshot,
    Handedness, Landmark,
};
use crate::config::Thresholds;
use crate::error::{PerfError, PsResult};
use rayon::prelude::*;
use std::collections::HashSet;
use strum::IntoEnumIterator;
use tracing::debug;

pub const LANDMARK_COUNT: usize = 21;

// --- GEOMETRY ---

/// Angle at `dip` between the segments towards `tip` and towards `pip`, in degrees.
pub fn joint_angle(tip: &Landmark, dip: &Landmark, pip: &Landmark) -> f64 {
    let v1 = [tip.x - dip.x, tip.y - dip.y, tip.z - dip.z];
    let v2 = [pip.x - dip.x, pip.y - dip.y, pip.z - dip.z];
    let dot = v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2];
    let n1 = (v1[0] * v1[0] + v1[1] * v1[1] + v1[2] * v1[2]).sqrt();
    let n2 = (v2[0] * v2[0] + v2[1] * v2[1] + v2[2] * v2[2]).sqrt();
    let cos = (dot / (n1 * n2 + 1e-8)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

pub fn finger_angles(landmarks: &[Landmark]) -> PsResult<FingerAngleRecord> {
    if landmarks.len() != LANDMARK_COUNT {
        return Err(PerfError::Validation(format!(
            "a hand needs {} landmarks, got {}",
            LANDMARK_COUNT,
            landmarks.len()
        )));
    }
    let mut record = FingerAngleRecord::default();
    for finger in Finger::iter() {
        let [tip, dip, pip] = finger.joint_indices();
        let angle = joint_angle(&landmarks[tip], &landmarks[dip], &landmarks[pip]);
        record.set(finger, round_to(angle, 1));
    }
    Ok(record)
}

impl DetectedHand {
    pub fn from_landmarks(hand: Handedness, landmarks: Vec<Landmark>) -> PsResult<Self> {
        let angles = finger_angles(&landmarks)?;
        Ok(Self {
            hand,
            angles,
            landmarks,
        })
    }

    pub fn from_angles(hand: Handedness, angles: FingerAngleRecord) -> Self {
        Self {
            hand,
            angles,
            landmarks: Vec::new(),
        }
    }
}

/// The hand's reported angles, or angles derived from its landmarks when the
/// detector only reported joint positions.
pub fn resolved_angles(hand: &DetectedHand) -> PsResult<FingerAngleRecord> {
    if hand.angles.is_empty() && !hand.landmarks.is_empty() {
        finger_angles(&hand.landmarks)
    } else {
        Ok(hand.angles)
    }
}

/// Derives missing angle records from landmarks. Frames are independent, so
/// this runs across the rayon pool.
pub fn fill_angles_from_landmarks(frames: &mut [FrameDetections]) -> PsResult<()> {
    frames.par_iter_mut().try_for_each(|frame| {
        for hand in frame.hands.iter_mut() {
            hand.angles = resolved_angles(hand)?;
        }
        Ok(())
    })
}

// --- SCORING ---

fn validate(frames: &[FrameDetections], total_frames: usize) -> PsResult<()> {
    let mut seen = HashSet::with_capacity(frames.len());
    for frame in frames {
        if frame.frame_index >= total_frames {
            return Err(PerfError::Validation(format!(
                "frame index {} is outside the {} extracted frames",
                frame.frame_index, total_frames
            )));
        }
        if !seen.insert(frame.frame_index) {
            return Err(PerfError::Validation(format!(
                "frame index {} reported twice",
                frame.frame_index
            )));
        }
        for hand in &frame.hands {
            if !hand.landmarks.is_empty() && hand.landmarks.len() != LANDMARK_COUNT {
                return Err(PerfError::Validation(format!(
                    "frame {} has a hand with {} landmarks",
                    frame.frame_index,
                    hand.landmarks.len()
                )));
            }
            for finger in Finger::iter() {
                if let Some(angle) = hand.angles.get(finger) {
                    if !(0.0..=180.0).contains(&angle) {
                        return Err(PerfError::Validation(format!(
                            "frame {} {} angle {} is outside 0-180°",
                            frame.frame_index, finger, angle
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Mean angle per finger over the records where that finger is present.
pub fn finger_averages<'a, I>(records: I) -> FingerAngleRecord
where
    I: IntoIterator<Item = &'a FingerAngleRecord> + Clone,
{
    let mut averages = FingerAngleRecord::default();
    for finger in Finger::iter() {
        let values: Vec<f64> = records
            .clone()
            .into_iter()
            .filter_map(|r| r.get(finger))
            .collect();
        if let Some(avg) = mean(&values) {
            averages.set(finger, avg);
        }
    }
    averages
}

/// Scores averages against the ideal ranges. Returns (angle score, issues).
pub fn evaluate_form(
    averages: &FingerAngleRecord,
    thresholds: &Thresholds,
) -> (u8, Vec<Issue>) {
    let mut score = 100i64;
    let mut issues = Vec::new();
    let margin = thresholds.hand_angle_margin;
    let deduction = i64::from(thresholds.hand_finger_deduction);

    for finger in Finger::iter() {
        let Some(average) = averages.get(finger) else {
            continue;
        };
        let (min, max) = finger.ideal_range();
        if average < min - margin {
            score -= deduction;
            issues.push(IssueKind::FingerOverCurled { finger, average }.issue());
        } else if average > max + margin {
            score -= deduction;
            issues.push(IssueKind::FingerTooStraight { finger, average }.issue());
        }
    }

    (score.clamp(0, 100) as u8, issues)
}

fn sample_snapshots(frames: &[&FrameDetections], thresholds: &Thresholds) -> Vec<HandSnapshot> {
    let stride = thresholds.snapshot_stride.max(1);
    frames
        .iter()
        .filter(|f| f.frame_index % stride == 0)
        .flat_map(|f| {
            f.hands
                .iter()
                .filter(|h| !h.landmarks.is_empty())
                .map(move |h| HandSnapshot {
                    frame_index: f.frame_index,
                    hand: h.hand,
                    landmarks: h
                        .landmarks
                        .iter()
                        .map(|l| Landmark::new(round_to(l.x, 4), round_to(l.y, 4), round_to(l.z, 4)))
                        .collect(),
                })
        })
        .take(thresholds.snapshot_cap)
        .collect()
}

pub fn score_hand_form(
    frames: &[FrameDetections],
    total_frames: usize,
    thresholds: &Thresholds,
) -> PsResult<HandAnalysisResult> {
    validate(frames, total_frames)?;

    if total_frames == 0 {
        return Ok(HandAnalysisResult::empty(0, IssueKind::NoFrames.issue()));
    }

    // Order by frame index so sampling never depends on detector completion order.
    let mut ordered: Vec<&FrameDetections> = frames.iter().collect();
    ordered.sort_by_key(|f| f.frame_index);

    let detected_frames = ordered.iter().filter(|f| !f.hands.is_empty()).count();
    let records: Vec<FingerAngleRecord> = ordered
        .iter()
        .flat_map(|f| f.hands.iter())
        .map(resolved_angles)
        .collect::<PsResult<_>>()?;

    let detection_rate = detected_frames as f64 / total_frames as f64;

    let averages = finger_averages(records.iter());
    let (angle_score, mut issues) = if records.is_empty() {
        (0, Vec::new())
    } else {
        evaluate_form(&averages, thresholds)
    };

    if detection_rate < thresholds.min_detection_rate {
        issues.push(
            IssueKind::LowDetectionRate {
                rate: detection_rate,
            }
            .issue(),
        );
    }

    let detection_score = clamp_score(detection_rate * 100.0);
    let overall_score = if detected_frames > 0 {
        clamp_score(f64::from(angle_score) * 0.7 + f64::from(detection_score) * 0.3)
    } else {
        0
    };

    debug!(
        "hand: {}/{} frames detected, {} records, angle {}, detection {}, overall {}",
        detected_frames,
        total_frames,
        records.len(),
        angle_score,
        detection_score,
        overall_score
    );

    Ok(HandAnalysisResult {
        hand_detected: detected_frames > 0,
        frame_count: total_frames,
        detected_frames,
        overall_score,
        finger_averages: averages,
        issues,
        hand_points: sample_snapshots(&ordered, thresholds),
    })
}
