// src/config/mod.rs
//! Pipeline configuration structures
//!
//! All knobs the excluded UI layer exposes, as one serde-friendly struct
//! with TOML round-tripping and an up-front validation pass. The Nyquist
//! check on the filter cutoff needs the recording's sample rate and is
//! therefore performed at filter design time, not here.

use serde::{Deserialize, Serialize};

use crate::error::{GaitError, GaitResult};
use crate::processing::events::{BoundaryPolicy, DetectionMode};
use crate::processing::filters::MAX_ORDER;

/// Complete gait pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitConfig {
    /// Low-pass filter design parameters.
    pub filter: FilterParams,
    /// Event detection parameters.
    pub detection: DetectionParams,
    /// Muscle activation parameters.
    pub activation: ActivationParams,
}

/// Low-pass filter design parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Butterworth design order.
    pub order: usize,
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f32,
}

/// Gait event detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Threshold on the normalized gait channels, in [0, 1].
    pub gait_threshold: f32,
    /// Detection strategy for the event-sample table.
    pub mode: DetectionMode,
    /// Tolerance band width for [`DetectionMode::Band`].
    pub band_width: f32,
    /// Resolution of boundary-ambiguous crossings.
    pub boundary_policy: BoundaryPolicy,
}

/// Muscle activation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationParams {
    /// Moving-average window for the EMG envelope, in samples.
    pub smoothing_window: usize,
    /// Activation threshold on the per-cycle-normalized envelope.
    pub threshold: f32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            filter: FilterParams::default(),
            detection: DetectionParams::default(),
            activation: ActivationParams::default(),
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            order: 3,
            cutoff_hz: 2.0,
        }
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            gait_threshold: 0.05,
            mode: DetectionMode::Edge,
            band_width: 0.01,
            boundary_policy: BoundaryPolicy::DropIncomplete,
        }
    }
}

impl Default for ActivationParams {
    fn default() -> Self {
        Self {
            smoothing_window: 50,
            threshold: 0.2,
        }
    }
}

/// Validate a configuration before running the pipeline.
pub fn validate_gait_config(config: &GaitConfig) -> GaitResult<()> {
    if config.filter.order == 0 || config.filter.order > MAX_ORDER {
        return Err(GaitError::Configuration {
            component: "config",
            reason: format!("filter order must be 1-{MAX_ORDER}, got {}", config.filter.order),
        });
    }
    if config.filter.cutoff_hz <= 0.0 {
        return Err(GaitError::Configuration {
            component: "config",
            reason: format!("cutoff must be positive, got {} Hz", config.filter.cutoff_hz),
        });
    }
    if !(0.0..=1.0).contains(&config.detection.gait_threshold) {
        return Err(GaitError::Configuration {
            component: "config",
            reason: format!(
                "gait threshold must be in [0, 1], got {}",
                config.detection.gait_threshold
            ),
        });
    }
    if config.detection.band_width < 0.0 {
        return Err(GaitError::Configuration {
            component: "config",
            reason: format!(
                "band width must be non-negative, got {}",
                config.detection.band_width
            ),
        });
    }
    if config.activation.smoothing_window == 0 {
        return Err(GaitError::Configuration {
            component: "config",
            reason: "smoothing window must be at least 1".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&config.activation.threshold) {
        return Err(GaitError::Configuration {
            component: "config",
            reason: format!(
                "activation threshold must be in [0, 1], got {}",
                config.activation.threshold
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_gait_config(&GaitConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_filter_params() {
        let mut config = GaitConfig::default();
        config.filter.order = 0;
        assert!(validate_gait_config(&config).is_err());

        config.filter.order = 3;
        config.filter.cutoff_hz = -2.0;
        assert!(validate_gait_config(&config).is_err());
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = GaitConfig::default();
        config.detection.gait_threshold = 1.5;
        assert!(validate_gait_config(&config).is_err());

        let mut config = GaitConfig::default();
        config.activation.threshold = -0.1;
        assert!(validate_gait_config(&config).is_err());

        let mut config = GaitConfig::default();
        config.detection.band_width = -0.01;
        assert!(validate_gait_config(&config).is_err());
    }

    #[test]
    fn test_invalid_smoothing_window() {
        let mut config = GaitConfig::default();
        config.activation.smoothing_window = 0;
        assert!(validate_gait_config(&config).is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = GaitConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: GaitConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_parses_from_toml_text() {
        let text = r#"
            [filter]
            order = 4
            cutoff_hz = 6.0

            [detection]
            gait_threshold = 0.1
            mode = "band"
            band_width = 0.02
            boundary_policy = "synthesize_boundary"

            [activation]
            smoothing_window = 25
            threshold = 0.3
        "#;
        let config: GaitConfig = toml::from_str(text).unwrap();
        assert_eq!(config.filter.order, 4);
        assert_eq!(config.detection.mode, DetectionMode::Band);
        assert_eq!(
            config.detection.boundary_policy,
            BoundaryPolicy::SynthesizeBoundary
        );
        assert!(validate_gait_config(&config).is_ok());
    }
}
