use perfscore::scorer::types::{DetectedHand, Handedness};
use perfscore::scorer::{Engine, FingerAngleRecord, FrameDetections, PitchFrame};
use proptest::prelude::*;

// --- STRATEGIES ---

prop_compose! {
    fn arb_pitch_frame()(
        time in 0.0..600.0f64,
        frequency in 20.0..4000.0f64,
        voiced in any::<bool>()
    ) -> PitchFrame {
        if voiced {
            PitchFrame::voiced(time, frequency)
        } else {
            PitchFrame::unvoiced(time)
        }
    }
}

prop_compose! {
    fn arb_onsets()(gaps in prop::collection::vec(0.0..3.0f64, 0..60)) -> Vec<f64> {
        gaps.iter()
            .scan(0.0, |t, gap| {
                *t += gap;
                Some(*t)
            })
            .collect()
    }
}

prop_compose! {
    fn arb_angles()(
        angles in prop::array::uniform5(prop::option::of(0.0..=180.0f64))
    ) -> FingerAngleRecord {
        FingerAngleRecord {
            thumb: angles[0],
            index: angles[1],
            middle: angles[2],
            ring: angles[3],
            pinky: angles[4],
        }
    }
}

prop_compose! {
    // One slot per extracted frame: unreported, reported without hands, or one hand.
    fn arb_hand_frames()(
        slots in prop::collection::vec(prop::option::of(prop::option::of(arb_angles())), 1..80)
    ) -> (usize, Vec<FrameDetections>) {
        let total = slots.len();
        let frames = slots
            .into_iter()
            .enumerate()
            .filter_map(|(frame_index, slot)| {
                slot.map(|angles| FrameDetections {
                    frame_index,
                    hands: angles
                        .map(|a| vec![DetectedHand::from_angles(Handedness::Right, a)])
                        .unwrap_or_default(),
                })
            })
            .collect();
        (total, frames)
    }
}

proptest! {
    #[test]
    fn prop_pitch_score_in_range(frames in prop::collection::vec(arb_pitch_frame(), 0..400)) {
        let result = Engine::default().score_pitch(&frames).unwrap();
        prop_assert!(result.score <= 100);
        prop_assert!(result.issues.len() <= 1);
        prop_assert!(result.curve().len() <= 400);
        for sample in result.curve() {
            prop_assert!(sample.cents_off >= 0.0 && sample.cents_off <= 50.0);
        }
    }

    #[test]
    fn prop_rhythm_score_in_range(onsets in arb_onsets(), tempo in 0.0..300.0f64) {
        let result = Engine::default().score_rhythm(&onsets, tempo).unwrap();
        prop_assert!(result.score <= 100);
        prop_assert!(result.issues.len() <= 1);
        prop_assert!(result.beats().len() <= 100);
    }

    #[test]
    fn prop_dynamics_ignore_absolute_level(
        envelope in prop::collection::vec(0.0..1.0f64, 1..300),
        k in prop::sample::select(vec![0.125, 0.5, 2.0, 8.0, 1024.0])
    ) {
        let engine = Engine::default();
        let base = engine.score_dynamics(&envelope).unwrap();
        let scaled: Vec<f64> = envelope.iter().map(|v| v * k).collect();
        let result = engine.score_dynamics(&scaled).unwrap();
        prop_assert!(base.score <= 100);
        prop_assert_eq!(base, result);
    }

    #[test]
    fn prop_hand_score_in_range((total, frames) in arb_hand_frames()) {
        let result = Engine::default().score_hand_form(&frames, total).unwrap();
        prop_assert!(result.overall_score <= 100);
        prop_assert!(result.detected_frames <= total);
        prop_assert!(result.hand_points.len() <= 20);
        prop_assert_eq!(result.hand_detected, result.detected_frames > 0);
        if !result.hand_detected {
            prop_assert_eq!(result.overall_score, 0);
        }
    }

    #[test]
    fn prop_hand_result_ignores_frame_order(
        (total, frames) in arb_hand_frames(),
        seed in any::<u64>()
    ) {
        let engine = Engine::default();
        let mut shuffled = frames.clone();
        fastrand::Rng::with_seed(seed).shuffle(&mut shuffled);

        let ordered = engine.score_hand_form(&frames, total).unwrap();
        let reordered = engine.score_hand_form(&shuffled, total).unwrap();
        prop_assert_eq!(ordered, reordered);
    }
}
