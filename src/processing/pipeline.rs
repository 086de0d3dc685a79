// src/processing/pipeline.rs
//! End-to-end gait analysis pipeline
//!
//! Mirrors the analysis flow the presentation layer drives: condition the
//! channels, detect gait events on the normalized foot-switch channels,
//! then analyze one selected cycle. Every stage is a pure batch
//! transformation, so re-running with the same recording and parameters
//! always produces identical output.

use rayon::prelude::*;
use tracing::debug;

use crate::config::{validate_gait_config, GaitConfig};
use crate::error::GaitResult;
use crate::processing::activation::{self, ActivationProfile};
use crate::processing::conditioner::normalize;
use crate::processing::cycles::{
    cycle_bounds, cycle_count, cycle_parameters, cycle_table, local_toe_off, CycleBounds,
    CycleParameter, CycleTable,
};
use crate::processing::events::{
    detect_band, detect_edges_with_policy, label_events, DetectionMode, EventSample, GaitEvent,
    GaitEventKind,
};
use crate::processing::filters::{low_pass_filter, FilterSpec};
use crate::processing::kinematics::{self, Joint, PhaseExtremum};
use crate::recording::{filtered_name, normalized_name, Recording, HEEL, TOE};

/// Typed gait events of both foot-switch channels, plus the displayable
/// event-sample tables.
#[derive(Debug, Clone)]
pub struct DetectedEvents {
    /// Heel events, alternating IC/HO.
    pub heel: Vec<GaitEvent>,
    /// Toe events, alternating FF/TO.
    pub toe: Vec<GaitEvent>,
    /// {time, value} rows for the heel channel per the detection mode.
    pub heel_table: Vec<EventSample>,
    /// {time, value} rows for the toe channel per the detection mode.
    pub toe_table: Vec<EventSample>,
}

impl DetectedEvents {
    /// Number of complete IC-to-IC cycles available.
    pub fn cycle_count(&self) -> usize {
        cycle_count(&self.heel)
    }
}

/// Everything the pipeline produces for one selected cycle.
#[derive(Debug, Clone)]
pub struct CycleAnalysis {
    /// The cycle's sample window.
    pub bounds: CycleBounds,
    /// Gait channels re-indexed to the percent-of-cycle axis.
    pub table: CycleTable,
    /// IC/HO/FF/TO positions within the cycle.
    pub parameters: Vec<CycleParameter>,
    /// Knee phase extrema (four values).
    pub knee: Vec<PhaseExtremum>,
    /// Ankle phase extrema (four values).
    pub ankle: Vec<PhaseExtremum>,
    /// Hip phase extrema (stance min, swing max).
    pub hip: Vec<PhaseExtremum>,
    /// One activation profile per declared EMG channel.
    pub activations: Vec<ActivationProfile>,
}

/// The configured analysis pipeline.
pub struct GaitPipeline {
    config: GaitConfig,
}

impl GaitPipeline {
    /// Build a pipeline after validating the configuration.
    pub fn new(config: GaitConfig) -> GaitResult<Self> {
        validate_gait_config(&config)?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &GaitConfig {
        &self.config
    }

    /// Condition all channels, appending the derived columns.
    ///
    /// Foot-switch channels get the non-negative clamp (switch voltage
    /// cannot be negative) and a normalized copy for thresholding; joint
    /// channels are filtered unclamped. Channels are independent, so the
    /// filtering fans out across a thread pool.
    pub fn condition(&self, recording: &mut Recording) -> GaitResult<()> {
        let spec = FilterSpec::lowpass(
            self.config.filter.order,
            self.config.filter.cutoff_hz,
            recording.sample_rate_hz(),
        );
        spec.validate()?;

        let mut jobs: Vec<(&str, bool)> = vec![(HEEL, true), (TOE, true)];
        for joint in [Joint::Hip, Joint::Knee, Joint::Ankle] {
            jobs.push((joint.channel_name(), false));
        }

        let filtered: Vec<(String, Vec<f32>)> = {
            let rec: &Recording = recording;
            jobs.par_iter()
                .map(|&(name, clamp)| {
                    let signal = rec.require_channel(name)?;
                    let spec = if clamp {
                        spec.clone().clamped()
                    } else {
                        spec.clone()
                    };
                    Ok((filtered_name(name), low_pass_filter(signal, spec)?))
                })
                .collect::<GaitResult<_>>()?
        };

        for (name, data) in filtered {
            recording.append_channel(name, data)?;
        }

        for name in [HEEL, TOE] {
            let source = filtered_name(name);
            let normalized = normalize(&source, recording.require_channel(&source)?)?;
            recording.append_channel(normalized_name(name), normalized)?;
        }

        debug!(
            order = self.config.filter.order,
            cutoff_hz = self.config.filter.cutoff_hz,
            "conditioned recording"
        );
        Ok(())
    }

    /// Detect gait events on the normalized foot-switch channels.
    ///
    /// Typed events always come from edge detection, which is the only
    /// strategy that yields an alternating crossing sequence; the band
    /// mode only changes what the displayable event table contains.
    pub fn detect(&self, recording: &Recording) -> GaitResult<DetectedEvents> {
        let threshold = self.config.detection.gait_threshold;
        let policy = self.config.detection.boundary_policy;
        let time = recording.time();

        let heel_signal = recording.require_channel(&normalized_name(HEEL))?;
        let toe_signal = recording.require_channel(&normalized_name(TOE))?;

        let heel_crossings = detect_edges_with_policy(heel_signal, threshold, policy);
        let toe_crossings = detect_edges_with_policy(toe_signal, threshold, policy);

        let heel = label_events(
            &heel_crossings,
            time,
            heel_signal,
            GaitEventKind::Ic,
            GaitEventKind::Ho,
        );
        let toe = label_events(
            &toe_crossings,
            time,
            toe_signal,
            GaitEventKind::Ff,
            GaitEventKind::To,
        );

        let table_for = |signal: &[f32], events: &[GaitEvent]| -> GaitResult<Vec<EventSample>> {
            match self.config.detection.mode {
                DetectionMode::Edge => Ok(events
                    .iter()
                    .map(|e| EventSample {
                        time: e.time,
                        value: e.value,
                    })
                    .collect()),
                DetectionMode::Band => {
                    Ok(detect_band(signal, threshold, self.config.detection.band_width)?
                        .into_iter()
                        .map(|(i, value)| EventSample {
                            time: time[i],
                            value,
                        })
                        .collect())
                }
            }
        };
        let heel_table = table_for(heel_signal, &heel)?;
        let toe_table = table_for(toe_signal, &toe)?;

        debug!(
            heel_events = heel.len(),
            toe_events = toe.len(),
            threshold,
            "detected gait events"
        );
        Ok(DetectedEvents {
            heel,
            toe,
            heel_table,
            toe_table,
        })
    }

    /// Analyze one 1-based cycle: phase table, event parameters, joint
    /// extrema, and muscle activation profiles.
    pub fn analyze_cycle(
        &self,
        recording: &Recording,
        events: &DetectedEvents,
        number: usize,
    ) -> GaitResult<CycleAnalysis> {
        let bounds = cycle_bounds(&events.heel, number)?;
        let parameters = cycle_parameters(bounds, &events.heel, &events.toe);
        let toe_off = local_toe_off(bounds, &events.toe)?;

        let heel_name = normalized_name(HEEL);
        let toe_name = normalized_name(TOE);
        let joint_names: Vec<String> = [Joint::Hip, Joint::Knee, Joint::Ankle]
            .iter()
            .map(|j| filtered_name(j.channel_name()))
            .collect();

        let mut table_channels: Vec<&str> = vec![&heel_name, &toe_name];
        table_channels.extend(joint_names.iter().map(String::as_str));
        let table = cycle_table(recording, bounds, &table_channels)?;

        let cycle_time = &recording.time()[bounds.start..=bounds.end];
        let extrema_for = |joint: Joint| -> GaitResult<Vec<PhaseExtremum>> {
            let channel = recording.require_channel(&filtered_name(joint.channel_name()))?;
            kinematics::extract(
                joint,
                &channel[bounds.start..=bounds.end],
                cycle_time,
                toe_off,
            )
        };
        let hip = extrema_for(Joint::Hip)?;
        let knee = extrema_for(Joint::Knee)?;
        let ankle = extrema_for(Joint::Ankle)?;

        let mut activations = Vec::with_capacity(recording.emg_names().len());
        for muscle in recording.emg_names() {
            let signal = recording.require_channel(muscle)?;
            activations.push(activation::analyze(
                muscle,
                signal,
                bounds,
                self.config.activation.smoothing_window,
                self.config.activation.threshold,
            )?);
        }

        debug!(
            cycle = number,
            start = bounds.start,
            end = bounds.end,
            toe_off,
            muscles = activations.len(),
            "analyzed cycle"
        );
        Ok(CycleAnalysis {
            bounds,
            table,
            parameters,
            knee,
            ankle,
            hip,
            activations,
        })
    }
}
