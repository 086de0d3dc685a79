// src/recording.rs
//! In-memory representation of one captured gait trial
//!
//! A [`Recording`] is a fixed-length, uniformly sampled table: one time
//! column plus a set of named channels that all share the same length and
//! time base. Raw channels are loaded once and never mutated; every
//! conditioning stage appends its output as a new named channel so the
//! originals stay available for inspection.

use crate::error::{GaitError, GaitResult};

/// Heel foot-switch channel name.
pub const HEEL: &str = "Heel";
/// Toe foot-switch channel name.
pub const TOE: &str = "Toe";
/// Hip joint-angle channel name.
pub const HIP: &str = "Hip";
/// Knee joint-angle channel name.
pub const KNEE: &str = "Knee";
/// Ankle joint-angle channel name.
pub const ANKLE: &str = "Ankle";

/// The five mandatory channels, in input-column order (after Time).
pub const BASE_CHANNELS: [&str; 5] = [HEEL, TOE, HIP, KNEE, ANKLE];

/// Maximum number of optional EMG channels a layout may declare.
pub const MAX_EMG_CHANNELS: usize = 9;

/// Derived-channel name for the low-pass-filtered version of `name`.
pub fn filtered_name(name: &str) -> String {
    format!("Filtered {name}")
}

/// Derived-channel name for the min-max-normalized version of `name`.
pub fn normalized_name(name: &str) -> String {
    format!("Normalized {name}")
}

/// Expected column order of the input table.
///
/// Column identity is purely positional: Time, the five base channels,
/// then zero or more named EMG channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLayout {
    emg: Vec<String>,
}

impl ChannelLayout {
    /// Layout with no EMG channels (Time, Heel, Toe, Hip, Knee, Ankle).
    pub fn base() -> Self {
        Self { emg: Vec::new() }
    }

    /// Layout with the given EMG channel names appended after Ankle.
    pub fn with_emg<I, S>(names: I) -> GaitResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let emg: Vec<String> = names.into_iter().map(Into::into).collect();
        if emg.len() > MAX_EMG_CHANNELS {
            return Err(GaitError::Configuration {
                component: "channel layout",
                reason: format!(
                    "{} EMG channels declared, at most {} supported",
                    emg.len(),
                    MAX_EMG_CHANNELS
                ),
            });
        }
        Ok(Self { emg })
    }

    /// Channel names in column order, excluding the leading Time column.
    pub fn channel_names(&self) -> Vec<String> {
        BASE_CHANNELS
            .iter()
            .map(|s| s.to_string())
            .chain(self.emg.iter().cloned())
            .collect()
    }

    /// Declared EMG channel names.
    pub fn emg_names(&self) -> &[String] {
        &self.emg
    }

    /// Total expected column count, including Time.
    pub fn column_count(&self) -> usize {
        1 + BASE_CHANNELS.len() + self.emg.len()
    }
}

impl Default for ChannelLayout {
    fn default() -> Self {
        Self::base()
    }
}

/// One complete, immutable gait trial.
#[derive(Debug, Clone)]
pub struct Recording {
    time: Vec<f32>,
    sample_rate_hz: f32,
    channels: Vec<(String, Vec<f32>)>,
    emg_names: Vec<String>,
}

impl Recording {
    /// Build a recording from a time column and named channels.
    ///
    /// Validates that time is strictly increasing, uniformly spaced, and
    /// that every channel matches its length. The sample rate is taken
    /// from the first time step; filter design relies on it, so a
    /// variable-rate capture is rejected here rather than silently
    /// mis-tuning the cutoff.
    pub fn new(
        time: Vec<f32>,
        channels: Vec<(String, Vec<f32>)>,
        emg_names: Vec<String>,
    ) -> GaitResult<Self> {
        if time.len() < 2 {
            return Err(GaitError::Configuration {
                component: "recording",
                reason: format!("need at least 2 samples, got {}", time.len()),
            });
        }
        if time.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GaitError::Configuration {
                component: "recording",
                reason: "time column is not strictly increasing".to_string(),
            });
        }
        for (name, data) in &channels {
            if data.len() != time.len() {
                return Err(GaitError::Configuration {
                    component: "recording",
                    reason: format!(
                        "channel '{}' has {} samples, time has {}",
                        name,
                        data.len(),
                        time.len()
                    ),
                });
            }
        }
        let dt = time[1] - time[0];
        // 1% relative jitter absorbs float rounding in parsed time
        // columns without letting a variable-rate capture through.
        if let Some(w) = time
            .windows(2)
            .find(|w| ((w[1] - w[0]) - dt).abs() > dt * 0.01)
        {
            return Err(GaitError::Configuration {
                component: "recording",
                reason: format!(
                    "time column is not uniformly sampled: step {} differs from nominal {dt}",
                    w[1] - w[0]
                ),
            });
        }
        let sample_rate_hz = 1.0 / dt;
        Ok(Self {
            time,
            sample_rate_hz,
            channels,
            emg_names,
        })
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when the recording holds no samples (cannot happen after
    /// construction, provided for completeness).
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample rate derived from the time column.
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }

    /// The shared time axis.
    pub fn time(&self) -> &[f32] {
        &self.time
    }

    /// Declared EMG channel names, in column order.
    pub fn emg_names(&self) -> &[String] {
        &self.emg_names
    }

    /// All channel names currently present, raw and derived.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&[f32]> {
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
    }

    /// Look up a channel by name, or fail with the set of known names.
    pub fn require_channel(&self, name: &str) -> GaitResult<&[f32]> {
        self.channel(name).ok_or_else(|| GaitError::Range {
            what: "channel",
            requested: name.to_string(),
            available: self.channel_names().join(", "),
        })
    }

    /// Append a derived channel.
    ///
    /// Re-running a stage with the same parameters replaces its previous
    /// output so the pipeline stays idempotent.
    pub fn append_channel(&mut self, name: impl Into<String>, data: Vec<f32>) -> GaitResult<()> {
        let name = name.into();
        if data.len() != self.time.len() {
            return Err(GaitError::Configuration {
                component: "recording",
                reason: format!(
                    "derived channel '{}' has {} samples, expected {}",
                    name,
                    data.len(),
                    self.time.len()
                ),
            });
        }
        if let Some(existing) = self.channels.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = data;
        } else {
            self.channels.push((name, data));
        }
        Ok(())
    }
}
