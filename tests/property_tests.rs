// tests/property_tests.rs
//! Property-based checks of the pipeline's algebraic guarantees.

use proptest::prelude::*;

use gait_core::processing::conditioner::{moving_average, normalize, rectify};
use gait_core::processing::events::{
    detect_edges, detect_edges_with_policy, BoundaryPolicy, EdgeDirection,
};
use gait_core::processing::filters::{ButterworthLowPass, FilterSpec};

fn varied_signal() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1000.0f32..1000.0, 2..400).prop_filter(
        "needs some spread to normalize",
        |v| {
            let min = v.iter().cloned().fold(f32::INFINITY, f32::min);
            let max = v.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            max - min > 50.0
        },
    )
}

proptest! {
    #[test]
    fn normalize_output_spans_exactly_unit_range(signal in varied_signal()) {
        let out = normalize("prop", &signal).unwrap();
        let min = out.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = out.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(min == 0.0);
        prop_assert!(max == 1.0);
        prop_assert!(out.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn normalize_is_invariant_under_positive_affine_maps(
        signal in varied_signal(),
        a in 0.1f32..10.0,
        b in -100.0f32..100.0,
    ) {
        let transformed: Vec<f32> = signal.iter().map(|&x| a * x + b).collect();
        let base = normalize("base", &signal).unwrap();
        let mapped = normalize("mapped", &transformed).unwrap();
        for (x, y) in base.iter().zip(&mapped) {
            prop_assert!((x - y).abs() < 1e-2, "{x} vs {y}");
        }
    }

    #[test]
    fn edge_detection_indices_strictly_increase(
        signal in prop::collection::vec(0.0f32..1.0, 2..500),
        threshold in 0.05f32..0.95,
    ) {
        let crossings = detect_edges(&signal, threshold);
        prop_assert!(crossings.windows(2).all(|w| w[0].index < w[1].index));
        prop_assert!(crossings.iter().all(|c| c.index < signal.len()));
    }

    #[test]
    fn boundary_policies_keep_indices_strictly_increasing(
        signal in prop::collection::vec(0.0f32..1.0, 1..500),
        threshold in 0.05f32..0.95,
    ) {
        for policy in [BoundaryPolicy::DropIncomplete, BoundaryPolicy::SynthesizeBoundary] {
            let crossings = detect_edges_with_policy(&signal, threshold, policy);
            prop_assert!(
                crossings.windows(2).all(|w| w[0].index < w[1].index),
                "{policy:?}: {crossings:?}"
            );
            // Rising opens, falling closes, directions alternate.
            if let (Some(first), Some(last)) = (crossings.first(), crossings.last()) {
                prop_assert_eq!(first.direction, EdgeDirection::Rising);
                prop_assert_eq!(last.direction, EdgeDirection::Falling);
            }
            for pair in crossings.windows(2) {
                prop_assert_ne!(pair[0].direction, pair[1].direction);
            }
        }
    }

    #[test]
    fn edge_directions_alternate(
        signal in prop::collection::vec(0.0f32..1.0, 2..500),
        threshold in 0.05f32..0.95,
    ) {
        let crossings = detect_edges(&signal, threshold);
        for pair in crossings.windows(2) {
            prop_assert_ne!(pair[0].direction, pair[1].direction);
        }
    }

    #[test]
    fn rectify_is_non_negative_and_idempotent(
        signal in prop::collection::vec(-100.0f32..100.0, 0..200),
    ) {
        let once = rectify(&signal);
        prop_assert!(once.iter().all(|&x| x >= 0.0));
        prop_assert_eq!(&rectify(&once), &once);
    }

    #[test]
    fn moving_average_preserves_length_and_bounds(
        signal in prop::collection::vec(-50.0f32..50.0, 1..300),
        window in 1usize..40,
    ) {
        let out = moving_average(&signal, window).unwrap();
        prop_assert_eq!(out.len(), signal.len());
        // Zero-padded convolution can attenuate but never exceed the
        // input's absolute peak.
        let peak = signal.iter().fold(0.0f32, |m, &x| m.max(x.abs()));
        prop_assert!(out.iter().all(|&x| x.abs() <= peak + 1e-3));
    }

    #[test]
    fn filtfilt_preserves_length(
        signal in prop::collection::vec(-10.0f32..10.0, 2..600),
        order in 1usize..=6,
    ) {
        let filter = ButterworthLowPass::design(
            FilterSpec::lowpass(order, 50.0, 1000.0),
        ).unwrap();
        let out = filter.filtfilt(&signal).unwrap();
        prop_assert_eq!(out.len(), signal.len());
        prop_assert!(out.iter().all(|v| v.is_finite()));
    }
}

mod stance_swing {
    use super::*;
    use gait_core::processing::kinematics::{extract, Joint};

    proptest! {
        #[test]
        fn extrema_respect_the_toe_off_split(
            window in prop::collection::vec(-90.0f32..90.0, 3..200),
            split in 0.01f64..0.99,
        ) {
            let to = ((window.len() as f64 * split) as usize).clamp(1, window.len() - 1);
            let time: Vec<f32> = (0..window.len()).map(|i| i as f32 * 0.001).collect();

            let out = extract(Joint::Knee, &window, &time, to).unwrap();
            prop_assert_eq!(out.len(), 4);
            let span = (window.len() - 1) as f32;
            let index_of = |percent: f32| (percent / 100.0 * span).round() as usize;

            // stance-min <= stance-max, swing-min <= swing-max.
            prop_assert!(out[0].value <= out[1].value);
            prop_assert!(out[2].value <= out[3].value);
            // Stance extrema before the split, swing extrema at/after it.
            prop_assert!(index_of(out[0].percent) < to);
            prop_assert!(index_of(out[1].percent) < to);
            prop_assert!(index_of(out[2].percent) >= to);
            prop_assert!(index_of(out[3].percent) >= to);
        }
    }
}
