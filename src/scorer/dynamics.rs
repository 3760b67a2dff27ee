use super::issues::IssueKind;
use super::stats::{clamp_score, mean};
use super::types::{AxisResult, AxisSeries};
use crate::config::Thresholds;
use crate::error::{PerfError, PsResult};
use tracing::debug;

/// Values at or below this fraction of the peak count as silence.
const SILENCE_FRACTION: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsMeasures {
    pub dynamic_range: f64,
    pub smoothness: f64,
}

/// Range is taken on raw values, smoothness on peak-normalised ones.
/// A single-window envelope has no differences and scores zero smoothness.
pub fn measure(envelope: &[f64], peak: f64) -> DynamicsMeasures {
    let floor = envelope
        .iter()
        .copied()
        .filter(|&v| v > SILENCE_FRACTION * peak)
        .fold(f64::INFINITY, f64::min);
    let dynamic_range = (peak - floor) / peak;

    let normalized: Vec<f64> = envelope.iter().map(|v| v / peak).collect();
    let diffs: Vec<f64> = normalized.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let smoothness = match mean(&diffs) {
        Some(avg) => 1.0 - (avg * 10.0).min(1.0),
        None => 0.0,
    };

    DynamicsMeasures {
        dynamic_range,
        smoothness,
    }
}

pub fn score_dynamics(envelope: &[f64], thresholds: &Thresholds) -> PsResult<AxisResult> {
    if let Some(i) = envelope.iter().position(|v| !v.is_finite() || *v < 0.0) {
        return Err(PerfError::Validation(format!(
            "energy window {} has invalid value {}",
            i, envelope[i]
        )));
    }

    let peak = envelope.iter().copied().fold(0.0, f64::max);
    if envelope.is_empty() || peak == 0.0 {
        debug!("dynamics: silent envelope of {} windows", envelope.len());
        return Ok(AxisResult::new(
            50,
            vec![IssueKind::VolumeTooLow.issue()],
            AxisSeries::None,
        ));
    }

    let m = measure(envelope, peak);
    let score = clamp_score(m.dynamic_range * 50.0 + m.smoothness * 50.0);

    let mut issues = Vec::new();
    if m.dynamic_range < thresholds.min_dynamic_range {
        issues.push(IssueKind::FlatDynamics.issue());
    }
    if m.smoothness < thresholds.min_smoothness {
        issues.push(IssueKind::UnstableLoudness.issue());
    }

    debug!(
        "dynamics: {} windows, range {:.3}, smoothness {:.3}, score {}",
        envelope.len(),
        m.dynamic_range,
        m.smoothness,
        score
    );

    Ok(AxisResult::new(score, issues, AxisSeries::None))
}
