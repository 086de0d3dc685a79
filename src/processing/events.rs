// src/processing/events.rs
//! Threshold-based gait event detection
//!
//! Works on conditioned, normalized channels. The canonical strategy is
//! sign-change edge detection on the above-threshold series; the
//! band-membership variant is kept as an optional mode for devices whose
//! threshold design needs a tolerance band instead of a true crossing.
//!
//! Crossings alternate rising/falling by construction. When a recording
//! starts or ends already above threshold the boundary crossing is
//! ambiguous, so both resolutions are implemented as explicit, selectable
//! policies rather than guessed.

use serde::{Deserialize, Serialize};

use crate::error::{GaitError, GaitResult};

/// Direction of a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// Signal went from below threshold to at/above it.
    Rising,
    /// Signal went from at/above threshold to below it.
    Falling,
}

/// One raw threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCrossing {
    /// Sample index of the first sample on the new side of the threshold.
    pub index: usize,
    /// Crossing direction.
    pub direction: EdgeDirection,
}

/// How to resolve crossings made ambiguous by the record boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Discard a leading falling or trailing rising crossing whose
    /// partner fell outside the record.
    #[default]
    DropIncomplete,
    /// Synthesize a rising crossing at index 0 / a falling crossing at
    /// the last sample when the record starts/ends above threshold.
    SynthesizeBoundary,
}

/// Which detection strategy builds the event-sample table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Sign-change edge detection (canonical).
    #[default]
    Edge,
    /// Membership in `threshold ± width/2`.
    Band,
}

/// The four named gait events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GaitEventKind {
    /// Initial Contact: heel strike, start of stance.
    Ic,
    /// Heel-Off: heel leaves the ground.
    Ho,
    /// Flat-Foot: toe contact within stance.
    Ff,
    /// Toe-Off: toe leaves the ground, stance to swing boundary.
    To,
}

impl GaitEventKind {
    /// Conventional short label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ic => "IC",
            Self::Ho => "HO",
            Self::Ff => "FF",
            Self::To => "TO",
        }
    }
}

/// A typed gait event on one channel.
///
/// Replaces parity-encoded flat index arrays: the kind travels with the
/// index, so no decoder has to remember which positions were which.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaitEvent {
    /// Event kind.
    pub kind: GaitEventKind,
    /// Sample index into the channel.
    pub index: usize,
    /// Time at that sample.
    pub time: f32,
    /// Channel value at that sample.
    pub value: f32,
}

/// One row of the displayable event table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventSample {
    /// Time of the detected point.
    pub time: f32,
    /// Channel value at that point.
    pub value: f32,
}

/// Sign-change edge detection.
///
/// Computes the above-threshold series and marks each sign change of its
/// first difference. Indices are shift-corrected: a rising crossing is
/// reported at the first sample at/above threshold, a falling crossing at
/// the first sample below. Output indices are strictly increasing.
pub fn detect_edges(signal: &[f32], threshold: f32) -> Vec<EdgeCrossing> {
    let mut crossings = Vec::new();
    for (i, pair) in signal.windows(2).enumerate() {
        let before = pair[0] >= threshold;
        let after = pair[1] >= threshold;
        if !before && after {
            crossings.push(EdgeCrossing {
                index: i + 1,
                direction: EdgeDirection::Rising,
            });
        } else if before && !after {
            crossings.push(EdgeCrossing {
                index: i + 1,
                direction: EdgeDirection::Falling,
            });
        }
    }
    crossings
}

/// Edge detection with the boundary policy applied.
///
/// Guarantees the result starts with a rising crossing and ends with a
/// falling one, so downstream alternation decoding cannot go off by one.
pub fn detect_edges_with_policy(
    signal: &[f32],
    threshold: f32,
    policy: BoundaryPolicy,
) -> Vec<EdgeCrossing> {
    let mut crossings = detect_edges(signal, threshold);
    if signal.is_empty() {
        return crossings;
    }

    let starts_above = signal[0] >= threshold;
    let ends_above = signal[signal.len() - 1] >= threshold;

    if starts_above {
        match policy {
            BoundaryPolicy::DropIncomplete => {
                // The leading falling crossing has no rising partner.
                if crossings
                    .first()
                    .is_some_and(|c| c.direction == EdgeDirection::Falling)
                {
                    crossings.remove(0);
                }
            }
            BoundaryPolicy::SynthesizeBoundary => {
                crossings.insert(
                    0,
                    EdgeCrossing {
                        index: 0,
                        direction: EdgeDirection::Rising,
                    },
                );
            }
        }
    }

    if ends_above {
        match policy {
            BoundaryPolicy::DropIncomplete => {
                if crossings
                    .last()
                    .is_some_and(|c| c.direction == EdgeDirection::Rising)
                {
                    crossings.pop();
                }
            }
            BoundaryPolicy::SynthesizeBoundary => {
                // A rising crossing on the very last sample has zero
                // observable contact; a synthesized falling partner would
                // share its index and break strict monotonicity. Drop the
                // rising instead. This also covers the single-sample
                // record, where the leading synthesized rising sits at
                // the last sample.
                if crossings.last().is_some_and(|c| {
                    c.direction == EdgeDirection::Rising && c.index == signal.len() - 1
                }) {
                    crossings.pop();
                } else {
                    crossings.push(EdgeCrossing {
                        index: signal.len() - 1,
                        direction: EdgeDirection::Falling,
                    });
                }
            }
        }
    }

    crossings
}

/// Band-membership detection: indices where the signal lies within
/// `threshold ± width/2`.
pub fn detect_band(signal: &[f32], threshold: f32, width: f32) -> GaitResult<Vec<(usize, f32)>> {
    if width < 0.0 {
        return Err(GaitError::Configuration {
            component: "event detector",
            reason: format!("band width must be non-negative, got {width}"),
        });
    }
    let half = width / 2.0;
    Ok(signal
        .iter()
        .enumerate()
        .filter(|(_, &x)| (x - threshold).abs() <= half)
        .map(|(i, &x)| (i, x))
        .collect())
}

/// Attach kinds, times, and values to a crossing sequence.
///
/// Rising crossings become `rising_kind`, falling ones `falling_kind`
/// (heel: IC/HO, toe: FF/TO).
pub fn label_events(
    crossings: &[EdgeCrossing],
    time: &[f32],
    signal: &[f32],
    rising_kind: GaitEventKind,
    falling_kind: GaitEventKind,
) -> Vec<GaitEvent> {
    crossings
        .iter()
        .map(|c| GaitEvent {
            kind: match c.direction {
                EdgeDirection::Rising => rising_kind,
                EdgeDirection::Falling => falling_kind,
            },
            index: c.index,
            time: time[c.index],
            value: signal[c.index],
        })
        .collect()
}

/// Raw index sequence of a crossing list.
pub fn index_sequence(crossings: &[EdgeCrossing]) -> Vec<usize> {
    crossings.iter().map(|c| c.index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: [f32; 13] = [
        0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0,
    ];

    #[test]
    fn test_step_signal_yields_two_rising_two_falling() {
        let crossings = detect_edges(&STEP, 0.5);
        assert_eq!(crossings.len(), 4);
        assert_eq!(
            crossings[0],
            EdgeCrossing {
                index: 3,
                direction: EdgeDirection::Rising
            }
        );
        assert_eq!(
            crossings[1],
            EdgeCrossing {
                index: 6,
                direction: EdgeDirection::Falling
            }
        );
        assert_eq!(crossings[2].index, 9);
        assert_eq!(crossings[3].index, 12);
    }

    #[test]
    fn test_indices_strictly_increasing() {
        let crossings = detect_edges(&STEP, 0.5);
        assert!(crossings.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn test_no_crossings_below_threshold() {
        assert!(detect_edges(&STEP, 2.0).is_empty());
    }

    #[test]
    fn test_drop_policy_trims_unpaired_boundary_crossings() {
        // Starts and ends above threshold.
        let signal = [1.0, 1.0, 0.0, 0.0, 1.0, 1.0];
        let crossings = detect_edges_with_policy(&signal, 0.5, BoundaryPolicy::DropIncomplete);
        // Leading falling and trailing rising both dropped.
        assert!(crossings.is_empty());
    }

    #[test]
    fn test_synthesize_policy_adds_boundary_crossings() {
        let signal = [1.0, 1.0, 0.0, 0.0, 1.0, 1.0];
        let crossings = detect_edges_with_policy(&signal, 0.5, BoundaryPolicy::SynthesizeBoundary);
        assert_eq!(crossings.len(), 4);
        assert_eq!(
            crossings[0],
            EdgeCrossing {
                index: 0,
                direction: EdgeDirection::Rising
            }
        );
        assert_eq!(
            crossings[3],
            EdgeCrossing {
                index: 5,
                direction: EdgeDirection::Falling
            }
        );
        // Alternation holds throughout.
        for pair in crossings.windows(2) {
            assert_ne!(pair[0].direction, pair[1].direction);
        }
    }

    #[test]
    fn test_synthesize_policy_drops_zero_length_trailing_contact() {
        // Rises on the very last sample: a synthesized falling partner
        // would land on the same index, so the pair is dropped whole.
        let crossings =
            detect_edges_with_policy(&[0.0, 0.0, 1.0], 0.5, BoundaryPolicy::SynthesizeBoundary);
        assert!(crossings.is_empty(), "got {crossings:?}");

        // Single sample above threshold: the leading synthesized rising
        // sits on the last sample and is dropped the same way.
        let single = detect_edges_with_policy(&[1.0], 0.5, BoundaryPolicy::SynthesizeBoundary);
        assert!(single.is_empty(), "got {single:?}");

        // A complete stride ahead of the degenerate tail survives.
        let signal = [0.0, 1.0, 1.0, 0.0, 1.0];
        let crossings =
            detect_edges_with_policy(&signal, 0.5, BoundaryPolicy::SynthesizeBoundary);
        assert_eq!(index_sequence(&crossings), vec![1, 3]);
        assert!(crossings.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn test_policies_agree_on_clean_signal() {
        let drop = detect_edges_with_policy(&STEP, 0.5, BoundaryPolicy::DropIncomplete);
        let synth = detect_edges_with_policy(&STEP, 0.5, BoundaryPolicy::SynthesizeBoundary);
        assert_eq!(drop, synth);
        assert_eq!(drop.len(), 4);
    }

    #[test]
    fn test_band_membership() {
        let signal = [0.0, 0.04, 0.05, 0.06, 0.2, 0.05];
        let hits = detect_band(&signal, 0.05, 0.02).unwrap();
        let indices: Vec<usize> = hits.iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_band_negative_width_rejected() {
        assert!(matches!(
            detect_band(&[0.0], 0.5, -0.1),
            Err(GaitError::Configuration { .. })
        ));
    }

    #[test]
    fn test_label_events_alternates_kinds() {
        let time: Vec<f32> = (0..13).map(|i| i as f32 * 0.001).collect();
        let crossings = detect_edges(&STEP, 0.5);
        let events = label_events(
            &crossings,
            &time,
            &STEP,
            GaitEventKind::Ic,
            GaitEventKind::Ho,
        );
        let kinds: Vec<GaitEventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                GaitEventKind::Ic,
                GaitEventKind::Ho,
                GaitEventKind::Ic,
                GaitEventKind::Ho
            ]
        );
        assert_eq!(events[0].index, 3);
        assert!((events[0].time - 0.003).abs() < 1e-6);
        assert_eq!(events[0].value, 1.0);
    }

    #[test]
    fn test_index_sequence() {
        let crossings = detect_edges(&STEP, 0.5);
        assert_eq!(index_sequence(&crossings), vec![3, 6, 9, 12]);
    }
}
