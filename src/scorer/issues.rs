use super::types::{Axis, Finger};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

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
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single diagnostic shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub suggestion: String,
}

impl Issue {
    pub fn new(
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            title: title.into(),
            description: description.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Raises the severity in place. Never lowers it.
    pub fn escalate(&mut self, severity: Severity) {
        if severity > self.severity {
            self.severity = severity;
        }
    }
}

/// Every diagnostic the engine knows how to emit.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    NoPitch,
    PitchDeviation { mean_cents: f64 },
    TooFewNotes,
    RhythmUnstable { cv: f64, tempo_bpm: f64 },
    VolumeTooLow,
    FlatDynamics,
    UnstableLoudness,
    FingerOverCurled { finger: Finger, average: f64 },
    FingerTooStraight { finger: Finger, average: f64 },
    LowDetectionRate { rate: f64 },
    NoFrames,
    HandUnavailable,
    AnalysisFailed { axis: Axis, message: String },
}

impl IssueKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::TooFewNotes | Self::FlatDynamics | Self::HandUnavailable => Severity::Info,
            Self::NoFrames | Self::AnalysisFailed { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn issue(&self) -> Issue {
        let severity = self.default_severity();
        match self {
            Self::NoPitch => Issue::new(
                severity,
                "No clear pitch detected",
                "No clear pitch information was found in the recording",
                "Record in a quiet room with the instrument close to the microphone",
            ),
            Self::PitchDeviation { mean_cents } => Issue::new(
                severity,
                "Pitch deviation is large",
                format!("Average pitch deviation {:.0} cents", mean_cents),
                "Practice note by note against a tuner and watch the pressing force on each string",
            ),
            Self::TooFewNotes => Issue::new(
                severity,
                "Too few notes detected",
                "Not enough notes were detected to assess the rhythm",
                "Record a longer practice passage",
            ),
            Self::RhythmUnstable { cv, tempo_bpm } => Issue::new(
                severity,
                "Rhythm not stable enough",
                format!(
                    "Note intervals vary a lot (coefficient of variation {:.2}), estimated tempo {:.0} BPM",
                    cv, tempo_bpm
                ),
                "Practice with a metronome, start slow and raise the tempo gradually",
            ),
            Self::VolumeTooLow => Issue::new(
                severity,
                "Volume too low",
                "The recording volume is extremely low",
                "Record closer to the microphone",
            ),
            Self::FlatDynamics => Issue::new(
                severity,
                "Insufficient dynamic variation",
                "The playing is flat and lacks contrast between loud and soft",
                "Shape each phrase and practice crescendo and decrescendo",
            ),
            Self::UnstableLoudness => Issue::new(
                severity,
                "Unstable loudness control",
                "There are many sudden jumps in loudness",
                "Keep the plucking force even from note to note",
            ),
            Self::FingerOverCurled { finger, average } => {
                let (min, max) = finger.ideal_range();
                Issue::new(
                    severity,
                    format!("{} over-curled", finger.label()),
                    format!(
                        "Average angle {:.0}°, keep it within {:.0}-{:.0}°",
                        average, min, max
                    ),
                    "Relax the fingers and keep a natural half-fist curve",
                )
            }
            Self::FingerTooStraight { finger, average } => {
                let (min, max) = finger.ideal_range();
                Issue::new(
                    severity,
                    format!("{} too straight", finger.label()),
                    format!(
                        "Average angle {:.0}°, keep it within {:.0}-{:.0}°",
                        average, min, max
                    ),
                    "Let the fingers bend naturally instead of locking them straight",
                )
            }
            Self::LowDetectionRate { rate } => Issue::new(
                severity,
                "Low hand-detection rate",
                format!("Hands were detected in only {:.0}% of frames", rate * 100.0),
                "Make sure the camera sees both hands clearly and the room is well lit",
            ),
            Self::NoFrames => Issue::new(
                severity,
                "No video frames",
                "No frames were extracted from the video",
                "Please record the video again",
            ),
            Self::HandUnavailable => Issue::new(
                severity,
                "Hand analysis unavailable",
                "The hand landmark detector is not available in this deployment",
                "Deploy with the hand detector enabled to get posture feedback",
            ),
            Self::AnalysisFailed { axis, message } => Issue::new(
                severity,
                format!("{} analysis failed", axis.label()),
                message.clone(),
                "Please record again",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_never_downgrades() {
        let mut issue = IssueKind::PitchDeviation { mean_cents: 45.0 }.issue();
        assert_eq!(issue.severity, Severity::Warning);
        issue.escalate(Severity::Error);
        assert_eq!(issue.severity, Severity::Error);
        issue.escalate(Severity::Info);
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn messages_embed_measurements() {
        let issue = IssueKind::RhythmUnstable {
            cv: 0.4567,
            tempo_bpm: 119.6,
        }
        .issue();
        assert!(issue.description.contains("0.46"));
        assert!(issue.description.contains("120 BPM"));

        let finger = IssueKind::FingerOverCurled {
            finger: Finger::Thumb,
            average: 110.2,
        }
        .issue();
        assert_eq!(finger.title, "Thumb over-curled");
        assert!(finger.description.contains("130-160"));
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
