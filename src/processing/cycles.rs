// src/processing/cycles.rs
//! Gait cycle segmentation
//!
//! A cycle is delimited by consecutive Initial Contact events on the heel
//! channel: cycle n runs from heel-IC[n-1] through heel-IC[n] inclusive.
//! Every channel (heel, toe, joints, EMG) is sliced on the same IC
//! boundaries, so all per-cycle tables share one 0-100
//! percent-of-cycle axis.

use serde::Serialize;

use crate::error::{GaitError, GaitResult};
use crate::processing::events::{GaitEvent, GaitEventKind};
use crate::recording::Recording;

/// Inclusive sample-index window of one gait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleBounds {
    /// 1-based cycle number.
    pub number: usize,
    /// Index of the opening IC.
    pub start: usize,
    /// Index of the closing IC (start of the next cycle).
    pub end: usize,
}

impl CycleBounds {
    /// Number of samples in the window, end inclusive.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Windows are never empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Convert an absolute sample index to a cycle-local offset.
    pub fn local(&self, index: usize) -> usize {
        index - self.start
    }

    /// Convert a cycle-local offset to a percent-of-cycle position.
    ///
    /// `cycle_bounds` always yields `start < end`, but the fields are
    /// public, so a hand-built single-sample window maps to 0% instead
    /// of dividing by a zero span.
    pub fn percent(&self, local: usize) -> f32 {
        let span = self.len() - 1;
        if span == 0 {
            return 0.0;
        }
        100.0 * local as f32 / span as f32
    }
}

/// One gait event expressed on the percent-of-cycle axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleParameter {
    /// Event kind (IC, HO, FF, TO).
    pub kind: GaitEventKind,
    /// Time-normalized position, 0-100% of the cycle.
    pub percent: f32,
    /// Original channel value at the event.
    pub value: f32,
}

/// Channels re-indexed to the percent-of-cycle axis.
#[derive(Debug, Clone, Serialize)]
pub struct CycleTable {
    /// Percent-of-cycle axis, 0 to 100.
    pub percent: Vec<f32>,
    /// Absolute time of each sample in the window.
    pub time: Vec<f32>,
    /// Named channel slices over the cycle window.
    pub channels: Vec<(String, Vec<f32>)>,
}

/// Resolve the sample window of 1-based cycle `number` from heel events.
pub fn cycle_bounds(heel_events: &[GaitEvent], number: usize) -> GaitResult<CycleBounds> {
    let ics: Vec<usize> = heel_events
        .iter()
        .filter(|e| e.kind == GaitEventKind::Ic)
        .map(|e| e.index)
        .collect();

    if ics.len() < 2 {
        return Err(GaitError::InsufficientEvents {
            channel: "Heel".to_string(),
            found: ics.len(),
            needed: 2,
        });
    }

    let available = ics.len() - 1;
    if number == 0 || number > available {
        return Err(GaitError::Range {
            what: "cycle",
            requested: number.to_string(),
            available: format!("1-{available}"),
        });
    }

    Ok(CycleBounds {
        number,
        start: ics[number - 1],
        end: ics[number],
    })
}

/// Number of complete IC-to-IC cycles in a heel event sequence.
pub fn cycle_count(heel_events: &[GaitEvent]) -> usize {
    let ics = heel_events
        .iter()
        .filter(|e| e.kind == GaitEventKind::Ic)
        .count();
    ics.saturating_sub(1)
}

/// Collect the events of both gait channels that fall inside the cycle,
/// re-expressed on the percent axis.
pub fn cycle_parameters(
    bounds: CycleBounds,
    heel_events: &[GaitEvent],
    toe_events: &[GaitEvent],
) -> Vec<CycleParameter> {
    let mut inside: Vec<&GaitEvent> = heel_events
        .iter()
        .chain(toe_events)
        .filter(|e| e.index >= bounds.start && e.index <= bounds.end)
        .collect();
    inside.sort_by_key(|e| e.index);
    // The closing IC belongs to the next cycle's parameter table.
    inside.retain(|e| !(e.kind == GaitEventKind::Ic && e.index == bounds.end));

    inside
        .into_iter()
        .map(|e| CycleParameter {
            kind: e.kind,
            percent: bounds.percent(bounds.local(e.index)),
            value: e.value,
        })
        .collect()
}

/// Slice the named channels to the cycle window on a shared percent axis.
pub fn cycle_table(
    recording: &Recording,
    bounds: CycleBounds,
    channel_names: &[&str],
) -> GaitResult<CycleTable> {
    let percent: Vec<f32> = (0..bounds.len()).map(|i| bounds.percent(i)).collect();
    let time = recording.time()[bounds.start..=bounds.end].to_vec();

    let mut channels = Vec::with_capacity(channel_names.len());
    for &name in channel_names {
        let data = recording.require_channel(name)?;
        channels.push((name.to_string(), data[bounds.start..=bounds.end].to_vec()));
    }

    Ok(CycleTable {
        percent,
        time,
        channels,
    })
}

/// Cycle-local index of the Toe-Off that splits stance from swing.
///
/// The split must fall strictly inside the window; a TO sitting on the
/// boundary cannot divide it into two non-empty phases.
pub fn local_toe_off(bounds: CycleBounds, toe_events: &[GaitEvent]) -> GaitResult<usize> {
    toe_events
        .iter()
        .find(|e| {
            e.kind == GaitEventKind::To && e.index > bounds.start && e.index < bounds.end
        })
        .map(|e| bounds.local(e.index))
        .ok_or_else(|| GaitError::InsufficientEvents {
            channel: "Toe".to_string(),
            found: 0,
            needed: 1,
        })
}
