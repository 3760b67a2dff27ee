use super::issues::{Issue, IssueKind};
use super::stats::clamp_score;
use super::types::{AudioReport, AxisResult, AxisSeries, FinalReport, HandAnalysisResult};
use crate::config::FusionWeights;
use crate::error::ExtractionFailure;
use tracing::{info, warn};

pub type AxisOutcome = Result<AxisResult, ExtractionFailure>;
pub type HandOutcome = Result<HandAnalysisResult, ExtractionFailure>;

fn failure_issue(failure: &ExtractionFailure) -> Issue {
    IssueKind::AnalysisFailed {
        axis: failure.axis,
        message: failure.message.clone(),
    }
    .issue()
}

/// Zero-score stand-in for an axis whose measurements never arrived.
pub fn substitute_axis(failure: &ExtractionFailure) -> AxisResult {
    warn!("{}; substituting a zero score", failure);
    AxisResult::new(0, vec![failure_issue(failure)], AxisSeries::None)
}

pub fn substitute_hand(failure: &ExtractionFailure) -> HandAnalysisResult {
    warn!("{}; substituting a zero score", failure);
    HandAnalysisResult::empty(0, failure_issue(failure))
}

fn resolve(outcome: AxisOutcome) -> AxisResult {
    outcome.unwrap_or_else(|failure| substitute_axis(&failure))
}

pub fn audio_score(pitch: u8, rhythm: u8, dynamics: u8, weights: &FusionWeights) -> u8 {
    clamp_score(
        f64::from(pitch) * weights.weight_pitch
            + f64::from(rhythm) * weights.weight_rhythm
            + f64::from(dynamics) * weights.weight_dynamics,
    )
}

pub fn final_score(audio: u8, hand: u8, weights: &FusionWeights) -> u8 {
    clamp_score(f64::from(audio) * weights.weight_audio + f64::from(hand) * weights.weight_hand)
}

pub fn fuse_audio(
    pitch: AxisOutcome,
    rhythm: AxisOutcome,
    dynamics: AxisOutcome,
    weights: &FusionWeights,
) -> AudioReport {
    let (pitch, rhythm, dynamics) = (resolve(pitch), resolve(rhythm), resolve(dynamics));
    let audio_score = audio_score(pitch.score, rhythm.score, dynamics.score, weights);

    let issues = pitch
        .issues
        .iter()
        .chain(&rhythm.issues)
        .chain(&dynamics.issues)
        .cloned()
        .collect();

    AudioReport {
        pitch,
        rhythm,
        dynamics,
        audio_score,
        issues,
    }
}

/// Joins all four axes. Issue order is pitch, rhythm, dynamics, hand.
pub fn fuse(
    pitch: AxisOutcome,
    rhythm: AxisOutcome,
    dynamics: AxisOutcome,
    hand: HandOutcome,
    weights: &FusionWeights,
) -> FinalReport {
    let audio = fuse_audio(pitch, rhythm, dynamics, weights);
    let hand = hand.unwrap_or_else(|failure| substitute_hand(&failure));

    let overall_score = final_score(audio.audio_score, hand.overall_score, weights);

    let mut issues = audio.issues;
    issues.extend(hand.issues.iter().cloned());

    info!(
        "fused: pitch {}, rhythm {}, dynamics {}, audio {}, hand {}, overall {}",
        audio.pitch.score,
        audio.rhythm.score,
        audio.dynamics.score,
        audio.audio_score,
        hand.overall_score,
        overall_score
    );

    FinalReport {
        pitch: audio.pitch,
        rhythm: audio.rhythm,
        dynamics: audio.dynamics,
        hand,
        audio_score: audio.audio_score,
        overall_score,
        issues,
        duration: None,
    }
}
