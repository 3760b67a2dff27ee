use super::issues::{IssueKind, Severity};
use super::stats::{clamp_score, mean, round_to, std_dev};
use super::types::{AxisResult, AxisSeries, BeatPoint};
use crate::config::Thresholds;
use crate::error::{PerfError, PsResult};
use tracing::debug;

const MIN_ONSETS: usize = 3;

fn validate(onsets: &[f64], tempo_bpm: f64) -> PsResult<()> {
    if !tempo_bpm.is_finite() || tempo_bpm < 0.0 {
        return Err(PerfError::Validation(format!(
            "estimated tempo must be a non-negative number, got {}",
            tempo_bpm
        )));
    }
    for (i, &t) in onsets.iter().enumerate() {
        if !t.is_finite() || t < 0.0 {
            return Err(PerfError::Validation(format!(
                "onset {} has invalid time {}",
                i, t
            )));
        }
    }
    if let Some(i) = onsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(PerfError::Validation(format!(
            "onsets must be ascending, but onset {} ({}) precedes onset {} ({})",
            i,
            onsets[i],
            i + 1,
            onsets[i + 1]
        )));
    }
    Ok(())
}

/// Coefficient of variation of the inter-onset intervals.
/// Falls back to 1.0 when the mean interval is not positive.
pub fn interval_cv(onsets: &[f64]) -> f64 {
    let intervals: Vec<f64> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
    match (mean(&intervals), std_dev(&intervals)) {
        (Some(m), Some(sd)) if m > 0.0 => sd / m,
        _ => 1.0,
    }
}

/// Tempo only feeds the issue text; it never affects the score.
pub fn score_rhythm(
    onsets: &[f64],
    estimated_tempo_bpm: f64,
    thresholds: &Thresholds,
) -> PsResult<AxisResult> {
    validate(onsets, estimated_tempo_bpm)?;

    if onsets.len() < MIN_ONSETS {
        debug!("rhythm: only {} onsets", onsets.len());
        return Ok(AxisResult::new(
            60,
            vec![IssueKind::TooFewNotes.issue()],
            AxisSeries::Beats(Vec::new()),
        ));
    }

    let cv = interval_cv(onsets);
    let score = clamp_score(100.0 - cv * 100.0);

    let beats = onsets
        .iter()
        .take(thresholds.beat_cap)
        .map(|&t| BeatPoint {
            time: round_to(t, 2),
        })
        .collect();

    let mut issues = Vec::new();
    if cv > thresholds.rhythm_warn_cv {
        let mut issue = IssueKind::RhythmUnstable {
            cv,
            tempo_bpm: estimated_tempo_bpm,
        }
        .issue();
        if cv > thresholds.rhythm_error_cv {
            issue.escalate(Severity::Error);
        }
        issues.push(issue);
    }

    debug!(
        "rhythm: {} onsets, cv {:.3}, tempo {:.0} bpm, score {}",
        onsets.len(),
        cv,
        estimated_tempo_bpm,
        score
    );

    Ok(AxisResult::new(score, issues, AxisSeries::Beats(beats)))
}
