use crate::error::{ExtractionFailure, PerfError, PsResult};
use crate::scorer::stats::round_to;
use crate::scorer::types::{
    Axis, BeatPoint, FinalReport, HandSnapshot, HandTrack, OnsetTrack, PitchFrame, PitchSample,
};
use crate::scorer::{Engine, Issue, Measurements};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A measurement as delivered by an upstream extractor: either the data or
/// the extractor's diagnostic text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extracted<T> {
    Failed { error: String },
    Ready(T),
}

impl<T> Extracted<T> {
    pub fn into_result(self, axis: Axis) -> Result<T, ExtractionFailure> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Failed { error } => Err(ExtractionFailure::new(axis, error)),
        }
    }
}

/// Everything the extraction layer produced for one uploaded recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub duration: Extracted<f64>,
    pub pitch: Extracted<Vec<PitchFrame>>,
    pub onsets: Extracted<OnsetTrack>,
    pub energy: Extracted<Vec<f64>>,
    pub hands: Extracted<HandTrack>,
}

impl MeasurementBundle {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PsResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn into_measurements(self) -> Measurements {
        Measurements {
            pitch: self.pitch.into_result(Axis::Pitch),
            onsets: self.onsets.into_result(Axis::Rhythm),
            energy: self.energy.into_result(Axis::Dynamics),
            hands: self.hands.into_result(Axis::Hand),
        }
    }
}

/// JSON layout consumed by the report pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub overall_score: u8,
    pub audio_score: u8,
    pub pitch_accuracy: u8,
    pub rhythm_accuracy: u8,
    pub dynamics: u8,
    pub hand_score: u8,
    pub hand_detected: bool,
    pub pitch_curve: Vec<PitchSample>,
    pub beat_alignment: Vec<BeatPoint>,
    pub hand_points: Vec<HandSnapshot>,
    pub issues: Vec<Issue>,
}

impl From<&FinalReport> for ReportDocument {
    fn from(report: &FinalReport) -> Self {
        Self {
            task_id: None,
            duration: report.duration,
            overall_score: report.overall_score,
            audio_score: report.audio_score,
            pitch_accuracy: report.pitch.score,
            rhythm_accuracy: report.rhythm.score,
            dynamics: report.dynamics.score,
            hand_score: report.hand.overall_score,
            hand_detected: report.hand.hand_detected,
            pitch_curve: report.pitch.curve().to_vec(),
            beat_alignment: report.rhythm.beats().to_vec(),
            hand_points: report.hand.hand_points.clone(),
            issues: report.issues.clone(),
        }
    }
}

/// Service: score a full bundle. Fails only when the media itself could not
/// be probed or a collaborator broke the measurement contract.
pub fn analyze_bundle(engine: &Engine, bundle: MeasurementBundle) -> PsResult<FinalReport> {
    let duration = match &bundle.duration {
        Extracted::Ready(d) if d.is_finite() && *d >= 0.0 => *d,
        Extracted::Ready(d) => {
            return Err(PerfError::Validation(format!(
                "media duration must be a non-negative number, got {}",
                d
            )))
        }
        Extracted::Failed { error } => return Err(PerfError::Media(error.clone())),
    };

    let task = bundle.task_id.clone().unwrap_or_else(|| "-".to_string());
    info!("[{}] Analyzing {:.1}s recording", task, duration);

    let mut report = engine.analyze(bundle.into_measurements())?;
    report.duration = Some(round_to(duration, 1));

    info!("[{}] Overall score {}", task, report.overall_score);
    Ok(report)
}

/// Service: score a bundle and render it as the report document.
pub fn report_document(engine: &Engine, bundle: MeasurementBundle) -> PsResult<ReportDocument> {
    let task_id = bundle.task_id.clone();
    let report = analyze_bundle(engine, bundle)?;
    let mut doc = ReportDocument::from(&report);
    doc.task_id = task_id;
    Ok(doc)
}
