// src/processing/filters.rs
//! Butterworth low-pass design and zero-phase application
//!
//! Filters are designed as a cascade of second-order sections (plus one
//! first-order section for odd orders) via the bilinear transform with
//! frequency pre-warping, then applied forward and backward. The
//! forward-backward pass cancels phase lag and doubles the effective
//! order, which is what the gait channels need: event timing must not be
//! shifted by the filter.

use serde::{Deserialize, Serialize};

use crate::error::{GaitError, GaitResult};

/// Highest supported design order (before the forward-backward doubling).
pub const MAX_ORDER: usize = 10;

/// Parameters of one low-pass filter design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Design order, 1..=10.
    pub order: usize,
    /// Cutoff frequency in Hz; must stay below Nyquist.
    pub cutoff_hz: f32,
    /// Sample rate of the channel being filtered, in Hz.
    pub sample_rate_hz: f32,
    /// Floor negative output at zero after filtering.
    ///
    /// Explicit mode for physically non-negative quantities such as
    /// foot-switch voltage; never applied by default.
    pub clamp_negative: bool,
}

impl FilterSpec {
    /// Low-pass spec without the non-negative clamp.
    pub fn lowpass(order: usize, cutoff_hz: f32, sample_rate_hz: f32) -> Self {
        Self {
            order,
            cutoff_hz,
            sample_rate_hz,
            clamp_negative: false,
        }
    }

    /// Enable the non-negative output clamp.
    pub fn clamped(mut self) -> Self {
        self.clamp_negative = true;
        self
    }

    /// Reject invalid designs before any sample is touched.
    pub fn validate(&self) -> GaitResult<()> {
        if self.order == 0 || self.order > MAX_ORDER {
            return Err(GaitError::Configuration {
                component: "filter",
                reason: format!("order must be 1-{MAX_ORDER}, got {}", self.order),
            });
        }
        if self.sample_rate_hz <= 0.0 {
            return Err(GaitError::Configuration {
                component: "filter",
                reason: format!("sample rate must be positive, got {} Hz", self.sample_rate_hz),
            });
        }
        let nyquist = self.sample_rate_hz / 2.0;
        if self.cutoff_hz <= 0.0 || self.cutoff_hz >= nyquist {
            return Err(GaitError::Configuration {
                component: "filter",
                reason: format!(
                    "cutoff {} Hz outside (0, {} Hz) Nyquist range",
                    self.cutoff_hz, nyquist
                ),
            });
        }
        Ok(())
    }
}

/// One normalized biquad section (a0 = 1).
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Biquad {
    /// Second-order low-pass from pre-warped frequency `k = tan(pi*fc/fs)`
    /// and pole-pair quality `q`.
    fn lowpass(k: f32, q: f32) -> Self {
        let k2 = k * k;
        let norm = 1.0 + k / q + k2;
        Self {
            b0: k2 / norm,
            b1: 2.0 * k2 / norm,
            b2: k2 / norm,
            a1: 2.0 * (k2 - 1.0) / norm,
            a2: (1.0 - k / q + k2) / norm,
        }
    }

    /// First-order low-pass section for odd design orders.
    fn first_order_lowpass(k: f32) -> Self {
        let norm = 1.0 + k;
        Self {
            b0: k / norm,
            b1: k / norm,
            b2: 0.0,
            a1: (k - 1.0) / norm,
            a2: 0.0,
        }
    }

    /// Run the section over `data` in place, from zero initial state.
    fn run_in_place(&self, data: &mut [f32]) {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for sample in data.iter_mut() {
            let x0 = *sample;
            let y0 = self.b0 * x0 + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
            *sample = y0;
        }
    }
}

/// A designed Butterworth low-pass filter.
pub struct ButterworthLowPass {
    sections: Vec<Biquad>,
    spec: FilterSpec,
}

impl ButterworthLowPass {
    /// Design the section cascade for `spec`.
    pub fn design(spec: FilterSpec) -> GaitResult<Self> {
        spec.validate()?;

        let n = spec.order;
        let k = (std::f32::consts::PI * spec.cutoff_hz / spec.sample_rate_hz).tan();

        let mut sections = Vec::with_capacity(n / 2 + 1);
        if n % 2 == 1 {
            sections.push(Biquad::first_order_lowpass(k));
        }
        // Butterworth pole pairs sit at equal angular spacing around the
        // unit circle; each pair maps to one biquad with
        // q = 1 / (2 cos(phi)).
        for i in 0..n / 2 {
            let phi = if n % 2 == 1 {
                std::f32::consts::PI * (i + 1) as f32 / n as f32
            } else {
                std::f32::consts::PI * (2 * i + 1) as f32 / (2 * n) as f32
            };
            sections.push(Biquad::lowpass(k, 1.0 / (2.0 * phi.cos())));
        }

        Ok(Self { sections, spec })
    }

    /// The spec this filter was designed from.
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Single forward pass (transient from zero initial state included).
    pub fn filter(&self, signal: &[f32]) -> Vec<f32> {
        let mut data = signal.to_vec();
        for section in &self.sections {
            section.run_in_place(&mut data);
        }
        data
    }

    /// Zero-phase forward-backward filtering.
    ///
    /// The signal is extended at both ends by odd-symmetric reflection so
    /// the startup transients of the two passes land in the padding, then
    /// filtered forward, reversed, filtered again, reversed, and trimmed
    /// back to the original length. Net phase shift is zero and the
    /// effective order doubles.
    pub fn filtfilt(&self, signal: &[f32]) -> GaitResult<Vec<f32>> {
        if signal.len() < 2 {
            return Err(GaitError::Configuration {
                component: "filter",
                reason: format!("signal too short to filter ({} samples)", signal.len()),
            });
        }

        let pad = (3 * (2 * self.spec.order + 1)).min(signal.len() - 1);
        let mut data = Vec::with_capacity(signal.len() + 2 * pad);

        // Odd extension: reflect around the end points.
        let first = signal[0];
        for i in (1..=pad).rev() {
            data.push(2.0 * first - signal[i]);
        }
        data.extend_from_slice(signal);
        let last = signal[signal.len() - 1];
        for i in 1..=pad {
            data.push(2.0 * last - signal[signal.len() - 1 - i]);
        }

        for section in &self.sections {
            section.run_in_place(&mut data);
        }
        data.reverse();
        for section in &self.sections {
            section.run_in_place(&mut data);
        }
        data.reverse();

        let mut out: Vec<f32> = data[pad..pad + signal.len()].to_vec();
        if self.spec.clamp_negative {
            for v in &mut out {
                if *v < 0.0 {
                    *v = 0.0;
                }
            }
        }
        Ok(out)
    }
}

/// Design and apply a zero-phase low-pass in one call.
pub fn low_pass_filter(signal: &[f32], spec: FilterSpec) -> GaitResult<Vec<f32>> {
    ButterworthLowPass::design(spec)?.filtfilt(signal)
}
