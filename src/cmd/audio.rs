use super::OutputFormat;
use crate::reports;
use clap::Args;
use perfscore::config::Config;
use perfscore::error::{ExtractionFailure, PsResult};
use perfscore::scorer::loader::{load_pitch_track_from_path, load_series_from_path};
use perfscore::scorer::{Axis, Engine, OnsetTrack};
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct AudioArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV with `time,frequency[,voiced]` rows.
    #[arg(long)]
    pub pitch: PathBuf,

    /// CSV with one onset time (seconds) per row.
    #[arg(long)]
    pub onsets: PathBuf,

    /// CSV with one energy window value per row.
    #[arg(long)]
    pub energy: PathBuf,

    #[arg(long, default_value_t = 0.0)]
    pub tempo: f64,

    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// A file that cannot be read is an extraction failure for its axis, not a
/// reason to drop the whole report.
fn extracted<T>(axis: Axis, loaded: PsResult<T>) -> Result<T, ExtractionFailure> {
    loaded.map_err(|e| {
        warn!("{} measurements unavailable: {}", axis, e);
        ExtractionFailure::new(axis, e.to_string())
    })
}

pub fn run(args: AudioArgs, engine: &Engine) -> PsResult<()> {
    let pitch = extracted(Axis::Pitch, load_pitch_track_from_path(&args.pitch));
    let onsets = extracted(
        Axis::Rhythm,
        load_series_from_path(&args.onsets).map(|onsets| OnsetTrack {
            onsets,
            tempo_bpm: args.tempo,
        }),
    );
    let energy = extracted(Axis::Dynamics, load_series_from_path(&args.energy));

    let report = engine.analyze_audio(pitch, onsets, energy)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("\n🎧 === AUDIO REPORT === 🎧");
            reports::print_audio_report(&report);
        }
    }
    Ok(())
}
