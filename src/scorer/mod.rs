pub mod dynamics;
pub mod fusion;
pub mod hand;
pub mod issues;
pub mod loader;
pub mod pitch;
pub mod rhythm;
pub mod stats;
pub mod types;

pub use self::fusion::{AxisOutcome, HandOutcome};
pub use self::issues::{Issue, IssueKind, Severity};
pub use self::types::{
    AudioReport, Axis, AxisResult, AxisSeries, FinalReport, Finger, FingerAngleRecord,
    FrameDetections, HandAnalysisResult, HandTrack, OnsetTrack, PitchFrame,
};

use crate::config::Config;
use crate::error::{ExtractionFailure, PsResult};
use tracing::{info, warn};

/// Whether a hand landmark detector exists in this deployment.
/// Resolved once when the engine is built, never probed per call.
///
/// With `Unavailable`, hand frames are not inspected at all: a track with at
/// least one frame yields the "unavailable" result even if its detections
/// would fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandCapability {
    #[default]
    Available,
    Unavailable,
}

/// Every measurement set for one recording. An `Err` marks an axis whose
/// upstream extraction failed.
#[derive(Debug, Clone)]
pub struct Measurements {
    pub pitch: Result<Vec<PitchFrame>, ExtractionFailure>,
    pub onsets: Result<OnsetTrack, ExtractionFailure>,
    pub energy: Result<Vec<f64>, ExtractionFailure>,
    pub hands: Result<HandTrack, ExtractionFailure>,
}

fn score_axis<T, R>(
    input: Result<T, ExtractionFailure>,
    score: impl FnOnce(T) -> PsResult<R>,
) -> PsResult<Result<R, ExtractionFailure>> {
    match input {
        Ok(measurements) => score(measurements).map(Ok),
        Err(failure) => Ok(Err(failure)),
    }
}

pub struct Engine {
    pub config: Config,
    hand_capability: HandCapability,
}

impl Engine {
    pub fn new(config: Config) -> PsResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hand_capability: HandCapability::default(),
        })
    }

    pub fn with_hand_capability(mut self, capability: HandCapability) -> Self {
        if capability == HandCapability::Unavailable {
            warn!("Hand landmark detector unavailable; hand analysis will be skipped.");
        }
        self.hand_capability = capability;
        self
    }

    pub fn hand_capability(&self) -> HandCapability {
        self.hand_capability
    }

    pub fn score_pitch(&self, frames: &[PitchFrame]) -> PsResult<AxisResult> {
        pitch::score_pitch(frames, &self.config.thresholds)
    }

    pub fn score_rhythm(&self, onsets: &[f64], estimated_tempo_bpm: f64) -> PsResult<AxisResult> {
        rhythm::score_rhythm(onsets, estimated_tempo_bpm, &self.config.thresholds)
    }

    pub fn score_dynamics(&self, envelope: &[f64]) -> PsResult<AxisResult> {
        dynamics::score_dynamics(envelope, &self.config.thresholds)
    }

    pub fn score_hand_form(
        &self,
        frames: &[FrameDetections],
        total_frames: usize,
    ) -> PsResult<HandAnalysisResult> {
        match self.hand_capability {
            HandCapability::Unavailable if total_frames > 0 => Ok(HandAnalysisResult::empty(
                total_frames,
                IssueKind::HandUnavailable.issue(),
            )),
            _ => hand::score_hand_form(frames, total_frames, &self.config.thresholds),
        }
    }

    /// Scores a hand track, deriving angles from landmarks where the detector
    /// only reported joint positions.
    pub fn score_hand_track(&self, mut track: HandTrack) -> PsResult<HandAnalysisResult> {
        if self.hand_capability == HandCapability::Available {
            hand::fill_angles_from_landmarks(&mut track.frames)?;
        }
        self.score_hand_form(&track.frames, track.total_frames)
    }

    pub fn fuse(
        &self,
        pitch: AxisOutcome,
        rhythm: AxisOutcome,
        dynamics: AxisOutcome,
        hand: HandOutcome,
    ) -> FinalReport {
        fusion::fuse(pitch, rhythm, dynamics, hand, &self.config.weights)
    }

    fn audio_axes(
        &self,
        pitch: Result<Vec<PitchFrame>, ExtractionFailure>,
        onsets: Result<OnsetTrack, ExtractionFailure>,
        energy: Result<Vec<f64>, ExtractionFailure>,
    ) -> PsResult<(AxisOutcome, AxisOutcome, AxisOutcome)> {
        let (pitch, (rhythm, dynamics)) = rayon::join(
            || score_axis(pitch, |frames| self.score_pitch(&frames)),
            || {
                rayon::join(
                    || score_axis(onsets, |t| self.score_rhythm(&t.onsets, t.tempo_bpm)),
                    || score_axis(energy, |envelope| self.score_dynamics(&envelope)),
                )
            },
        );
        Ok((pitch?, rhythm?, dynamics?))
    }

    /// Audio-only report for recordings without video.
    pub fn analyze_audio(
        &self,
        pitch: Result<Vec<PitchFrame>, ExtractionFailure>,
        onsets: Result<OnsetTrack, ExtractionFailure>,
        energy: Result<Vec<f64>, ExtractionFailure>,
    ) -> PsResult<AudioReport> {
        let (pitch, rhythm, dynamics) = self.audio_axes(pitch, onsets, energy)?;
        let report = fusion::fuse_audio(pitch, rhythm, dynamics, &self.config.weights);
        info!("Audio analysis complete: {}", report.audio_score);
        Ok(report)
    }

    /// Runs the four axis scorers concurrently and fuses them once all are done.
    pub fn analyze(&self, measurements: Measurements) -> PsResult<FinalReport> {
        let Measurements {
            pitch,
            onsets,
            energy,
            hands,
        } = measurements;

        let (audio, hand) = rayon::join(
            || self.audio_axes(pitch, onsets, energy),
            || score_axis(hands, |track| self.score_hand_track(track)),
        );
        let (pitch, rhythm, dynamics) = audio?;
        Ok(self.fuse(pitch, rhythm, dynamics, hand?))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: Config::default(),
            hand_capability: HandCapability::default(),
        }
    }
}
