use crate::error::{PerfError, PsResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub weights: FusionWeights,
    #[command(flatten)]
    pub thresholds: Thresholds,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    // === AUDIO (sum to 1.0) ===
    #[arg(long, default_value_t = 0.40)]
    pub weight_pitch: f64,
    #[arg(long, default_value_t = 0.35)]
    pub weight_rhythm: f64,
    #[arg(long, default_value_t = 0.25)]
    pub weight_dynamics: f64,

    // === FINAL (sum to 1.0) ===
    #[arg(long, default_value_t = 0.60)]
    pub weight_audio: f64,
    #[arg(long, default_value_t = 0.40)]
    pub weight_hand: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            weight_pitch: 0.40,
            weight_rhythm: 0.35,
            weight_dynamics: 0.25,
            weight_audio: 0.60,
            weight_hand: 0.40,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    // === PITCH (cents) ===
    #[arg(long, default_value_t = 25.0)]
    pub pitch_warn_cents: f64,
    #[arg(long, default_value_t = 40.0)]
    pub pitch_error_cents: f64,
    #[arg(long, default_value_t = 200)]
    pub pitch_curve_cap: usize,

    // === RHYTHM (coefficient of variation) ===
    #[arg(long, default_value_t = 0.3)]
    pub rhythm_warn_cv: f64,
    #[arg(long, default_value_t = 0.5)]
    pub rhythm_error_cv: f64,
    #[arg(long, default_value_t = 100)]
    pub beat_cap: usize,

    // === DYNAMICS ===
    #[arg(long, default_value_t = 0.3)]
    pub min_dynamic_range: f64,
    #[arg(long, default_value_t = 0.4)]
    pub min_smoothness: f64,

    // === HAND FORM ===
    #[arg(long, default_value_t = 15.0)]
    pub hand_angle_margin: f64,
    #[arg(long, default_value_t = 10)]
    pub hand_finger_deduction: u32,
    #[arg(long, default_value_t = 0.3)]
    pub min_detection_rate: f64,
    #[arg(long, default_value_t = 10)]
    pub snapshot_stride: usize,
    #[arg(long, default_value_t = 20)]
    pub snapshot_cap: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pitch_warn_cents: 25.0,
            pitch_error_cents: 40.0,
            pitch_curve_cap: 200,
            rhythm_warn_cv: 0.3,
            rhythm_error_cv: 0.5,
            beat_cap: 100,
            min_dynamic_range: 0.3,
            min_smoothness: 0.4,
            hand_angle_margin: 15.0,
            hand_finger_deduction: 10,
            min_detection_rate: 0.3,
            snapshot_stride: 10,
            snapshot_cap: 20,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PsResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PsResult<()> {
        let w = &self.weights;
        let weights = [
            ("weight_pitch", w.weight_pitch),
            ("weight_rhythm", w.weight_rhythm),
            ("weight_dynamics", w.weight_dynamics),
            ("weight_audio", w.weight_audio),
            ("weight_hand", w.weight_hand),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(PerfError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let t = &self.thresholds;
        let limits = [
            ("pitch_warn_cents", t.pitch_warn_cents),
            ("pitch_error_cents", t.pitch_error_cents),
            ("rhythm_warn_cv", t.rhythm_warn_cv),
            ("rhythm_error_cv", t.rhythm_error_cv),
            ("min_dynamic_range", t.min_dynamic_range),
            ("min_smoothness", t.min_smoothness),
            ("hand_angle_margin", t.hand_angle_margin),
            ("min_detection_rate", t.min_detection_rate),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(PerfError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let caps = [
            ("pitch_curve_cap", t.pitch_curve_cap),
            ("beat_cap", t.beat_cap),
            ("snapshot_stride", t.snapshot_stride),
            ("snapshot_cap", t.snapshot_cap),
        ];
        if let Some((name, _)) = caps.into_iter().find(|&(_, v)| v == 0) {
            return Err(PerfError::Config(format!("{} must be at least 1", name)));
        }
        if t.pitch_error_cents < t.pitch_warn_cents || t.rhythm_error_cv < t.rhythm_warn_cv {
            return Err(PerfError::Config(
                "error thresholds must not be below their warning thresholds".to_string(),
            ));
        }
        Ok(())
    }

    /// Overlays every flag the user typed explicitly onto a file-loaded profile.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(weights.weight_pitch);
        update_if_present!(weights.weight_rhythm);
        update_if_present!(weights.weight_dynamics);
        update_if_present!(weights.weight_audio);
        update_if_present!(weights.weight_hand);

        update_if_present!(thresholds.pitch_warn_cents);
        update_if_present!(thresholds.pitch_error_cents);
        update_if_present!(thresholds.pitch_curve_cap);
        update_if_present!(thresholds.rhythm_warn_cv);
        update_if_present!(thresholds.rhythm_error_cv);
        update_if_present!(thresholds.beat_cap);
        update_if_present!(thresholds.min_dynamic_range);
        update_if_present!(thresholds.min_smoothness);
        update_if_present!(thresholds.hand_angle_margin);
        update_if_present!(thresholds.hand_finger_deduction);
        update_if_present!(thresholds.min_detection_rate);
        update_if_present!(thresholds.snapshot_stride);
        update_if_present!(thresholds.snapshot_cap);
    }
}
