use super::types::PitchFrame;
use crate::error::PsResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Reads a `time,frequency[,voiced]` table as produced by an F0 tracker.
/// Empty or `nan` frequencies mark unvoiced frames; when the voiced column is
/// missing, a frame is voiced exactly when it carries a frequency.
pub fn load_pitch_track<R: Read>(source: R) -> PsResult<Vec<PitchFrame>> {
    let mut rdr = reader(source);
    let mut frames = Vec::new();
    let mut skipped = 0;

    for rec in rdr.records() {
        let rec = rec?;
        let Some(time) = rec.get(0).and_then(|s| s.parse::<f64>().ok()) else {
            skipped += 1;
            continue;
        };
        let frequency = rec
            .get(1)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|f| f.is_finite());
        let voiced = rec
            .get(2)
            .and_then(parse_flag)
            .unwrap_or(frequency.is_some());

        frames.push(PitchFrame {
            time,
            frequency,
            voiced,
        });
    }

    if skipped > 0 {
        warn!("Skipped {} unreadable rows in pitch track.", skipped);
    }
    debug!("Loaded {} pitch frames", frames.len());
    Ok(frames)
}

/// Reads the first column of a headed CSV as a series of numbers
/// (onset times, energy windows).
pub fn load_series<R: Read>(source: R) -> PsResult<Vec<f64>> {
    let mut rdr = reader(source);
    let mut values = Vec::new();
    let mut skipped = 0;

    for rec in rdr.records() {
        let rec = rec?;
        match rec.get(0).and_then(|s| s.parse::<f64>().ok()) {
            Some(v) => values.push(v),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} unreadable rows in series.", skipped);
    }
    Ok(values)
}

pub fn load_pitch_track_from_path<P: AsRef<Path>>(path: P) -> PsResult<Vec<PitchFrame>> {
    debug!("Loading pitch track from {:?}", path.as_ref());
    load_pitch_track(File::open(path)?)
}

pub fn load_series_from_path<P: AsRef<Path>>(path: P) -> PsResult<Vec<f64>> {
    debug!("Loading series from {:?}", path.as_ref());
    load_series(File::open(path)?)
}
