// src/error.rs
//! Unified error handling for the gait analysis core
//!
//! Every failure the pipeline can produce is detected before any partial
//! output is built, and carries enough context (channel name, requested
//! cycle, computed bound) for the caller to correct the input.

use thiserror::Error;

/// Crate-wide error type.
///
/// All pipeline stages report through this enum so callers get one
/// consistent surface regardless of which stage rejected the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaitError {
    /// Invalid parameters supplied to a pipeline stage (bad filter
    /// design, zero-length window, threshold outside [0, 1], ...).
    #[error("invalid {component} configuration: {reason}")]
    Configuration {
        /// Stage or struct that rejected the parameters.
        component: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// Min-max rescaling was attempted on a (near-)constant signal.
    #[error("channel '{channel}' is constant (peak-to-peak {peak_to_peak}); cannot rescale")]
    DegenerateSignal {
        /// Name of the offending channel.
        channel: String,
        /// Observed peak-to-peak amplitude.
        peak_to_peak: f32,
    },

    /// A requested cycle number, index, or channel name does not exist.
    #[error("{what} '{requested}' out of range (available: {available})")]
    Range {
        /// What was looked up ("cycle", "channel", "toe-off index", ...).
        what: &'static str,
        /// The value that was requested.
        requested: String,
        /// The bound or set that was actually available.
        available: String,
    },

    /// Too few gait events exist to segment the recording.
    #[error("insufficient gait events on '{channel}': found {found}, need at least {needed}")]
    InsufficientEvents {
        /// Channel whose event sequence came up short.
        channel: String,
        /// Number of usable events found.
        found: usize,
        /// Minimum number required.
        needed: usize,
    },

    /// The input table does not match the configured channel layout.
    #[error("input schema mismatch at line {line}: {reason}")]
    Schema {
        /// 1-based line number in the input text.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

/// Convenience alias used throughout the crate.
pub type GaitResult<T> = Result<T, GaitError>;
