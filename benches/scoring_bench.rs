use criterion::{criterion_group, criterion_main, Criterion};
use perfscore::scorer::types::{DetectedHand, Handedness, Landmark};
use perfscore::scorer::{Engine, FrameDetections, HandTrack, Measurements, OnsetTrack, PitchFrame};
use std::hint::black_box;

// ~30 s of measurements: 100 Hz pitch frames, 2 onsets/s, 43 energy windows/s, 2 video frames/s.
fn setup_measurements(rng: &mut fastrand::Rng) -> Measurements {
    let pitch: Vec<PitchFrame> = (0..3000)
        .map(|i| {
            let t = i as f64 * 0.01;
            if rng.f64() < 0.2 {
                PitchFrame::unvoiced(t)
            } else {
                PitchFrame::voiced(t, 110.0 + rng.f64() * 770.0)
            }
        })
        .collect();

    let mut t = 0.0;
    let onsets: Vec<f64> = (0..60)
        .map(|_| {
            t += 0.4 + rng.f64() * 0.2;
            t
        })
        .collect();

    let energy: Vec<f64> = (0..1300).map(|_| rng.f64()).collect();

    let frames = (0..60)
        .map(|frame_index| FrameDetections {
            frame_index,
            hands: vec![DetectedHand {
                hand: Handedness::Right,
                angles: Default::default(),
                landmarks: (0..21)
                    .map(|_| Landmark::new(rng.f64(), rng.f64(), rng.f64() * 0.1))
                    .collect(),
            }],
        })
        .collect();

    Measurements {
        pitch: Ok(pitch),
        onsets: Ok(OnsetTrack {
            onsets,
            tempo_bpm: 120.0,
        }),
        energy: Ok(energy),
        hands: Ok(HandTrack {
            total_frames: 60,
            frames,
        }),
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let engine = Engine::default();
    let mut rng = fastrand::Rng::with_seed(42);
    let measurements = setup_measurements(&mut rng);

    let pitch = measurements.pitch.clone().unwrap_or_default();
    c.bench_function("score_pitch (3k frames)", |b| {
        b.iter(|| engine.score_pitch(black_box(&pitch)))
    });

    c.bench_function("analyze (30s recording)", |b| {
        b.iter(|| engine.analyze(black_box(measurements.clone())))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
