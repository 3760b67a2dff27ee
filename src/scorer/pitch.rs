use super::issues::{IssueKind, Severity};
use super::stats::{clamp_score, mean, round_to};
use super::types::{AxisResult, AxisSeries, PitchFrame, PitchSample};
use crate::config::Thresholds;
use crate::error::{PerfError, PsResult};
use tracing::debug;

const NOTE_NAMES: [&str; 12] = [
    "C", "C♯", "D", "D♯", "E", "F", "F♯", "G", "G♯", "A", "A♯", "B",
];

/// Continuous MIDI number, A4 = 440 Hz = 69.
#[inline(always)]
pub fn hz_to_midi(frequency: f64) -> f64 {
    69.0 + 12.0 * (frequency / 440.0).log2()
}

/// Distance to the nearest equal-tempered note, in cents (0..=50).
#[inline(always)]
pub fn cents_off_nearest(frequency: f64) -> f64 {
    let midi = hz_to_midi(frequency);
    (midi - midi.round()).abs() * 100.0
}

pub fn note_name(frequency: f64) -> String {
    let midi = hz_to_midi(frequency).round() as i32;
    let pitch_class = NOTE_NAMES[midi.rem_euclid(12) as usize];
    format!("{}{}", pitch_class, midi.div_euclid(12) - 1)
}

fn validate(frames: &[PitchFrame]) -> PsResult<()> {
    for (i, frame) in frames.iter().enumerate() {
        if !frame.time.is_finite() || frame.time < 0.0 {
            return Err(PerfError::Validation(format!(
                "pitch frame {} has invalid time {}",
                i, frame.time
            )));
        }
        if frame.voiced {
            match frame.frequency {
                Some(f) if f.is_finite() && f > 0.0 => {}
                other => {
                    return Err(PerfError::Validation(format!(
                        "voiced pitch frame {} has invalid frequency {:?}",
                        i, other
                    )))
                }
            }
        }
    }
    Ok(())
}

pub fn score_pitch(frames: &[PitchFrame], thresholds: &Thresholds) -> PsResult<AxisResult> {
    validate(frames)?;

    let voiced: Vec<(f64, f64)> = frames
        .iter()
        .filter(|f| f.voiced)
        .filter_map(|f| f.frequency.map(|hz| (f.time, hz)))
        .collect();

    if voiced.is_empty() {
        debug!("pitch: no voiced frames out of {}", frames.len());
        return Ok(AxisResult::new(
            50,
            vec![IssueKind::NoPitch.issue()],
            AxisSeries::Curve(Vec::new()),
        ));
    }

    let deviations: Vec<f64> = voiced.iter().map(|&(_, hz)| cents_off_nearest(hz)).collect();
    let mean_deviation = mean(&deviations).unwrap_or(0.0);
    let score = clamp_score(100.0 - mean_deviation * 2.0);

    let mut curve: Vec<PitchSample> = voiced
        .iter()
        .zip(&deviations)
        .map(|(&(time, hz), &cents)| PitchSample {
            time: round_to(time, 2),
            frequency: round_to(hz, 1),
            note: note_name(hz),
            cents_off: round_to(cents, 1),
        })
        .collect();

    let cap = thresholds.pitch_curve_cap.max(1);
    if curve.len() > cap {
        let step = curve.len() / cap;
        curve = curve.into_iter().step_by(step).collect();
    }

    let mut issues = Vec::new();
    if mean_deviation > thresholds.pitch_warn_cents {
        let mut issue = IssueKind::PitchDeviation {
            mean_cents: mean_deviation,
        }
        .issue();
        if mean_deviation > thresholds.pitch_error_cents {
            issue.escalate(Severity::Error);
        }
        issues.push(issue);
    }

    debug!(
        "pitch: {} voiced frames, mean deviation {:.1} cents, score {}",
        voiced.len(),
        mean_deviation,
        score
    );

    Ok(AxisResult::new(score, issues, AxisSeries::Curve(curve)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detuned(semitone_offset: i32, cents: f64) -> f64 {
        440.0 * 2f64.powf((semitone_offset as f64 + cents / 100.0) / 12.0)
    }

    #[test]
    fn note_names_follow_midi_octaves() {
        assert_eq!(note_name(440.0), "A4");
        assert_eq!(note_name(261.63), "C4");
        assert_eq!(note_name(detuned(4, 0.0)), "C♯5");
    }

    #[test]
    fn curve_is_downsampled_by_fixed_stride() {
        let frames: Vec<PitchFrame> = (0..450)
            .map(|i| PitchFrame::voiced(i as f64 * 0.01, 440.0))
            .collect();
        let result = score_pitch(&frames, &Thresholds::default()).unwrap();
        let curve = result.curve();
        // 450 / 200 = stride 2
        assert_eq!(curve.len(), 225);
        assert_eq!(curve[0].time, 0.0);
        assert_eq!(curve[1].time, 0.02);
    }

    #[test]
    fn short_curve_is_kept_whole() {
        let frames: Vec<PitchFrame> = (0..200)
            .map(|i| PitchFrame::voiced(i as f64 * 0.01, 440.0))
            .collect();
        let result = score_pitch(&frames, &Thresholds::default()).unwrap();
        assert_eq!(result.curve().len(), 200);
    }

    #[test]
    fn unvoiced_frames_are_ignored() {
        let frames = vec![
            PitchFrame::unvoiced(0.0),
            PitchFrame::voiced(0.01, detuned(0, 30.0)),
            PitchFrame::unvoiced(0.02),
        ];
        let result = score_pitch(&frames, &Thresholds::default()).unwrap();
        assert_eq!(result.score, 40);
        assert_eq!(result.curve().len(), 1);
        assert_eq!(result.curve()[0].cents_off, 30.0);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn voiced_frame_without_frequency_is_rejected() {
        let frames = vec![PitchFrame {
            time: 0.0,
            frequency: None,
            voiced: true,
        }];
        assert!(matches!(
            score_pitch(&frames, &Thresholds::default()),
            Err(PerfError::Validation(_))
        ));
    }
}
