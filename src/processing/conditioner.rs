// src/processing/conditioner.rs
//! Elementwise signal conditioning: rescaling, rectification, smoothing
//!
//! These are the pure building blocks every later stage composes.
//! Rescaling on a constant signal would divide by zero, so that case is
//! detected up front and reported with the channel name instead of
//! leaking NaN into downstream tables.

use crate::error::{GaitError, GaitResult};

/// Peak-to-peak amplitude below which a signal counts as constant.
///
/// Scaled by the signal's magnitude so large-valued but flat channels are
/// still caught.
fn degenerate_tolerance(min: f32, max: f32) -> f32 {
    f32::EPSILON * 8.0 * min.abs().max(max.abs()).max(1.0)
}

fn min_max(name: &str, signal: &[f32]) -> GaitResult<(f32, f32)> {
    if signal.is_empty() {
        return Err(GaitError::Configuration {
            component: "conditioner",
            reason: format!("channel '{name}' is empty"),
        });
    }
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &x in signal {
        min = min.min(x);
        max = max.max(x);
    }
    if max - min <= degenerate_tolerance(min, max) {
        return Err(GaitError::DegenerateSignal {
            channel: name.to_string(),
            peak_to_peak: max - min,
        });
    }
    Ok((min, max))
}

/// Min-max rescale to [0, 1].
///
/// Fails with [`GaitError::DegenerateSignal`] on a (near-)constant
/// signal; the result otherwise spans exactly [0, 1].
pub fn normalize(name: &str, signal: &[f32]) -> GaitResult<Vec<f32>> {
    let (min, max) = min_max(name, signal)?;
    let span = max - min;
    Ok(signal.iter().map(|&x| (x - min) / span).collect())
}

/// Affine rescale to an arbitrary `[new_min, new_max]` range.
pub fn scale(name: &str, signal: &[f32], new_min: f32, new_max: f32) -> GaitResult<Vec<f32>> {
    if new_min >= new_max {
        return Err(GaitError::Configuration {
            component: "conditioner",
            reason: format!("invalid target range [{new_min}, {new_max}]"),
        });
    }
    let normalized = normalize(name, signal)?;
    let span = new_max - new_min;
    Ok(normalized.iter().map(|&x| x * span + new_min).collect())
}

/// Full-wave rectification (absolute value), used on EMG channels.
pub fn rectify(signal: &[f32]) -> Vec<f32> {
    signal.iter().map(|x| x.abs()).collect()
}

/// Centered moving-average smoothing.
///
/// Output has the same length as the input. Edge behavior is zero-padded
/// convolution: boundary samples are attenuated, not removed, matching
/// `convolve(signal, ones(window)/window, mode="same")`.
pub fn moving_average(signal: &[f32], window: usize) -> GaitResult<Vec<f32>> {
    if window == 0 {
        return Err(GaitError::Configuration {
            component: "conditioner",
            reason: "moving-average window must be at least 1".to_string(),
        });
    }
    let n = signal.len();
    let offset = (window - 1) / 2;
    let inv = 1.0 / window as f32;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        // Kernel span for output sample i under "same" alignment.
        let hi = i + offset;
        let lo = hi.saturating_sub(window - 1);
        let hi = hi.min(n - 1);
        let sum: f32 = signal[lo..=hi].iter().sum();
        out.push(sum * inv);
    }
    Ok(out)
}
