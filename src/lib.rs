//! Gait-Core: gait-cycle segmentation and analysis for biomechanical recordings
//!
//! This library processes multi-channel gait recordings (foot-switch
//! signals, joint angles, and optional surface EMG) as pure batch
//! transformations:
//!
//! - Signal conditioning: zero-phase Butterworth low-pass filtering,
//!   min-max normalization, rectification, moving-average smoothing
//! - Threshold-crossing gait event detection (IC, HO, FF, TO)
//! - IC-to-IC cycle segmentation on a shared percent-of-cycle axis
//! - Stance/swing joint-angle extrema per cycle
//! - Per-cycle muscle activation profiles
//!
//! The presentation layer (file upload, charts, parameter widgets) is an
//! external collaborator: it supplies raw arrays and renders the typed
//! tables this crate returns.
//!
//! # Quick Start
//!
//! ```rust
//! use gait_core::config::GaitConfig;
//! use gait_core::io::RecordingCache;
//! use gait_core::processing::GaitPipeline;
//! use gait_core::recording::ChannelLayout;
//!
//! fn main() -> Result<(), gait_core::GaitError> {
//!     let bytes = b"\
//!     0.000 0.0 0.0 10.0 35.0 -2.0\n\
//!     0.001 0.1 0.2 10.1 35.2 -2.1\n\
//!     0.002 0.9 0.8 10.2 35.4 -2.2\n";
//!
//!     let mut cache = RecordingCache::new();
//!     let recording = cache.load(bytes, &ChannelLayout::base())?;
//!
//!     let pipeline = GaitPipeline::new(GaitConfig::default())?;
//!     let mut recording = (*recording).clone();
//!     pipeline.condition(&mut recording)?;
//!     let events = pipeline.detect(&recording)?;
//!     println!("{} complete cycles", events.cycle_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod processing;
pub mod recording;

// Re-export commonly used types for convenience
pub use config::GaitConfig;
pub use error::{GaitError, GaitResult};
pub use io::RecordingCache;
pub use processing::{
    CycleAnalysis, DetectedEvents, FilterSpec, GaitEvent, GaitEventKind, GaitPipeline,
};
pub use recording::{ChannelLayout, Recording};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "gait-core");
    }
}
