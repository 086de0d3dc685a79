// src/processing/activation.rs
//! Per-cycle muscle activation profiles
//!
//! Each EMG channel is rectified, envelope-smoothed, sliced to the cycle
//! window, re-normalized within the cycle, and binarized against an
//! activation threshold. Normalizing per cycle (not globally) makes the
//! activation magnitude comparable across cycles and subjects.

use serde::Serialize;

use crate::error::{GaitError, GaitResult};
use crate::processing::conditioner::{moving_average, rectify};
use crate::processing::cycles::CycleBounds;

/// Binary activation profile of one muscle over one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationProfile {
    /// EMG channel name.
    pub muscle: String,
    /// Percent-of-cycle axis shared with the kinematic tables.
    pub percent: Vec<f32>,
    /// Per-cycle-normalized envelope, in [0, 1].
    pub envelope: Vec<f32>,
    /// True where the normalized envelope reaches the threshold.
    pub active: Vec<bool>,
}

impl ActivationProfile {
    /// Fraction of the cycle spent active.
    pub fn duty_cycle(&self) -> f32 {
        if self.active.is_empty() {
            return 0.0;
        }
        self.active.iter().filter(|&&a| a).count() as f32 / self.active.len() as f32
    }
}

/// Analyze one muscle channel over one cycle.
///
/// A flat (e.g. all-zero) envelope within the window carries no
/// activation information; it yields an all-inactive profile rather than
/// an error, and never spurious activation.
pub fn analyze(
    muscle: &str,
    signal: &[f32],
    bounds: CycleBounds,
    smoothing_window: usize,
    threshold: f32,
) -> GaitResult<ActivationProfile> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(GaitError::Configuration {
            component: "activation analyzer",
            reason: format!("threshold must be in [0, 1], got {threshold}"),
        });
    }
    if bounds.end >= signal.len() {
        return Err(GaitError::Range {
            what: "cycle window",
            requested: format!("{}-{}", bounds.start, bounds.end),
            available: format!("0-{}", signal.len() - 1),
        });
    }

    let envelope = moving_average(&rectify(signal), smoothing_window)?;
    let window = &envelope[bounds.start..=bounds.end];

    let percent: Vec<f32> = (0..bounds.len()).map(|i| bounds.percent(i)).collect();

    let min = window.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = window.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let span = max - min;
    if span <= f32::EPSILON * 8.0 * min.abs().max(max.abs()).max(1.0) {
        // Degenerate envelope: report no activation.
        return Ok(ActivationProfile {
            muscle: muscle.to_string(),
            percent,
            envelope: vec![0.0; window.len()],
            active: vec![false; window.len()],
        });
    }

    let normalized: Vec<f32> = window.iter().map(|&x| (x - min) / span).collect();
    let active: Vec<bool> = normalized.iter().map(|&x| x >= threshold).collect();

    Ok(ActivationProfile {
        muscle: muscle.to_string(),
        percent,
        envelope: normalized,
        active,
    })
}
