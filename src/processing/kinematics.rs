// src/processing/kinematics.rs
//! Phase-relative joint kinematics
//!
//! For one cycle-windowed joint channel the extractor splits the window
//! at the local Toe-Off and reports the extrema of each phase separately.
//! A single global min/max would blur clinically distinct markers: peak
//! knee flexion in swing and peak knee flexion in stance are different
//! quantities even when one of them is the global extreme.

use serde::Serialize;

use crate::error::{GaitError, GaitResult};

/// The three joints the extractor reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    /// Hip flexion/extension angle.
    Hip,
    /// Knee flexion/extension angle.
    Knee,
    /// Ankle dorsi/plantarflexion angle.
    Ankle,
}

impl Joint {
    /// Raw channel name for this joint.
    pub fn channel_name(&self) -> &'static str {
        match self {
            Self::Hip => crate::recording::HIP,
            Self::Knee => crate::recording::KNEE,
            Self::Ankle => crate::recording::ANKLE,
        }
    }
}

/// One phase-specific extremum of a joint channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseExtremum {
    /// Conventional parameter label (MKEst, MADsw, ...).
    pub label: &'static str,
    /// Percent-of-cycle position of the extremum.
    pub percent: f32,
    /// Absolute time of the extremum.
    pub time: f32,
    /// Joint angle at the extremum.
    pub value: f32,
}

/// (value, local index) pairs of the four phase extrema.
struct StanceSwingExtrema {
    stance_min: (f32, usize),
    stance_max: (f32, usize),
    swing_min: (f32, usize),
    swing_max: (f32, usize),
}

fn argmin_max(window: &[f32], offset: usize) -> ((f32, usize), (f32, usize)) {
    let mut min = (window[0], offset);
    let mut max = (window[0], offset);
    for (i, &v) in window.iter().enumerate() {
        if v < min.0 {
            min = (v, offset + i);
        }
        if v > max.0 {
            max = (v, offset + i);
        }
    }
    (min, max)
}

/// Min/max with locations over stance `[0, to)` and swing `[to, end)`.
fn min_max_stance_swing(window: &[f32], toe_off: usize) -> GaitResult<StanceSwingExtrema> {
    if toe_off == 0 || toe_off >= window.len() {
        return Err(GaitError::Range {
            what: "toe-off index",
            requested: toe_off.to_string(),
            available: format!("1-{}", window.len().saturating_sub(1)),
        });
    }
    let (stance_min, stance_max) = argmin_max(&window[..toe_off], 0);
    let (swing_min, swing_max) = argmin_max(&window[toe_off..], toe_off);
    Ok(StanceSwingExtrema {
        stance_min,
        stance_max,
        swing_min,
        swing_max,
    })
}

/// Labels for the four phase extrema of one joint, in
/// stance-min / stance-max / swing-min / swing-max order. `None` means
/// the extremum is not reported for that joint.
fn labels(joint: Joint) -> [Option<&'static str>; 4] {
    match joint {
        // Min knee angle ~ extension, max ~ flexion.
        Joint::Knee => [Some("MKEst"), Some("MKFst"), Some("MKEsw"), Some("MKFsw")],
        // Min ankle angle ~ plantarflexion, max ~ dorsiflexion.
        Joint::Ankle => [Some("MAPst"), Some("MADst"), Some("MAPsw"), Some("MADsw")],
        // Hip kinematics are characterized by peak extension in stance
        // and peak flexion in swing; the other two extrema are omitted.
        Joint::Hip => [Some("MHEst"), None, None, Some("MHFsw")],
    }
}

/// Extract the phase extrema of one joint over one cycle window.
///
/// `window` and `time` are the cycle-sliced channel and time axis;
/// `toe_off` is the cycle-local stance-to-swing split.
pub fn extract(
    joint: Joint,
    window: &[f32],
    time: &[f32],
    toe_off: usize,
) -> GaitResult<Vec<PhaseExtremum>> {
    if window.len() != time.len() {
        return Err(GaitError::Configuration {
            component: "kinematics",
            reason: format!(
                "window has {} samples, time axis {}",
                window.len(),
                time.len()
            ),
        });
    }
    let extrema = min_max_stance_swing(window, toe_off)?;
    let span = (window.len() - 1) as f32;

    let ordered = [
        extrema.stance_min,
        extrema.stance_max,
        extrema.swing_min,
        extrema.swing_max,
    ];
    let mut out = Vec::with_capacity(4);
    for (slot, (value, index)) in labels(joint).into_iter().zip(ordered) {
        if let Some(label) = slot {
            out.push(PhaseExtremum {
                label,
                percent: 100.0 * index as f32 / span,
                time: time[index],
                value,
            });
        }
    }
    Ok(out)
}
