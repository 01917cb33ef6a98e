//! Periodic functors — shaping functions bundled with period metadata.
//!
//! A [`Functor`] maps `(phase, lower, upper, hint)` to a value meant to lie in
//! `[lower, upper]`, and reports how long one period lasts for a given time
//! dilation. Coefficient-driven shapes carry a normalization `scale` equal to
//! their total absolute amplitude, which shortens the period accordingly.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::synth::{self, Coefficients};
use crate::error::ConfigError;

/// Radians covered by one period at unit dilation and unit scale.
/// Normalized synthesis doubles the phase, so half a turn spans a full cycle.
pub const PERIOD_RADIANS: f64 = PI;

/// Plain shaping function: `(phase, lower, upper, sample_interval_hint) -> value`.
pub type ShapeFn = fn(f64, f64, f64, f64) -> f64;

/// Coefficient-driven shaping function; receives the coefficient list and normalization flag.
pub type WaveShapeFn = fn(f64, f64, f64, f64, &Coefficients, bool) -> f64;

// ── Shaping functions ───────────────────────────────────────

/// `lower + (upper - lower) · sin x`
pub fn scaled_sine(x: f64, lower: f64, upper: f64, _hint: f64) -> f64 {
    lower + (upper - lower) * x.sin()
}

/// `lower + (upper - lower) · 2 sin x`
pub fn double_sine(x: f64, lower: f64, upper: f64, _hint: f64) -> f64 {
    lower + (upper - lower) * (2.0 * x.sin())
}

/// `lower + (upper - lower) · 2(1 - cos x)`
pub fn cosine_well(x: f64, lower: f64, upper: f64, _hint: f64) -> f64 {
    lower + (upper - lower) * (2.0 * (1.0 - x.cos()))
}

/// Sine synthesis stretched onto `[lower, upper]`.
pub fn scaled_wave(x: f64, lower: f64, upper: f64, _hint: f64, coefficients: &Coefficients, normalize: bool) -> f64 {
    lower + (upper - lower) * synth::wave(x, coefficients, normalize)
}

/// Cosine synthesis stretched onto `[lower, upper]`.
pub fn scaled_in_phase_wave(
    x: f64,
    lower: f64,
    upper: f64,
    _hint: f64,
    coefficients: &Coefficients,
    normalize: bool,
) -> f64 {
    lower + (upper - lower) * synth::in_phase_wave(x, coefficients, normalize)
}

// ── Functor ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Shape {
    Plain(ShapeFn),
    Wave {
        func: WaveShapeFn,
        coefficients: Coefficients,
        normalize: bool,
    },
}

/// A shaping function with its period calculation attached.
#[derive(Debug, Clone)]
pub struct Functor {
    shape: Shape,
    scale: f64,
}

impl Functor {
    /// Wrap a plain shaping function. Its scale is always 1.
    pub fn periodic(func: ShapeFn) -> Self {
        Functor {
            shape: Shape::Plain(func),
            scale: 1.0,
        }
    }

    /// Wrap a coefficient-driven shaping function.
    ///
    /// With `normalize` set, the scale becomes the total absolute amplitude;
    /// an empty list or one whose amplitudes sum to zero is rejected here so
    /// that evaluation never divides by zero.
    pub fn wave(func: WaveShapeFn, coefficients: Coefficients, normalize: bool) -> Result<Self, ConfigError> {
        if coefficients
            .pairs()
            .iter()
            .any(|c| !c.frequency.is_finite() || !c.amplitude.is_finite())
        {
            return Err(ConfigError::NonFinite { field: "coefficients" });
        }

        let scale = if normalize {
            if coefficients.is_empty() {
                return Err(ConfigError::EmptyCoefficients);
            }
            let total = coefficients.total_amplitude();
            if total == 0.0 {
                return Err(ConfigError::ZeroAmplitude);
            }
            total
        } else {
            1.0
        };

        Ok(Functor {
            shape: Shape::Wave {
                func,
                coefficients,
                normalize,
            },
            scale,
        })
    }

    /// Evaluate the shape at `phase`.
    pub fn call(&self, phase: f64, lower: f64, upper: f64, sample_interval_hint: f64) -> f64 {
        match &self.shape {
            Shape::Plain(func) => func(phase, lower, upper, sample_interval_hint),
            Shape::Wave {
                func,
                coefficients,
                normalize,
            } => func(phase, lower, upper, sample_interval_hint, coefficients, *normalize),
        }
    }

    /// Period in the units of `dilation` (seconds for samplers).
    /// Signed: a negative dilation yields a negative period.
    pub fn period(&self, dilation: f64) -> f64 {
        (dilation / self.scale) * PERIOD_RADIANS
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn coefficients(&self) -> Option<&Coefficients> {
        match &self.shape {
            Shape::Plain(_) => None,
            Shape::Wave { coefficients, .. } => Some(coefficients),
        }
    }
}

// ── Waveform descriptors ────────────────────────────────────

/// Serializable description of a functor, as stored in preset data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum Waveform {
    Sine,
    DoubleSine,
    CosineWell,
    Wave {
        coefficients: Coefficients,
        #[serde(default = "default_normalize")]
        normalize: bool,
    },
    InPhaseWave {
        coefficients: Coefficients,
        #[serde(default = "default_normalize")]
        normalize: bool,
    },
}

fn default_normalize() -> bool {
    true
}

impl Waveform {
    pub fn build(&self) -> Result<Functor, ConfigError> {
        match self {
            Waveform::Sine => Ok(Functor::periodic(scaled_sine)),
            Waveform::DoubleSine => Ok(Functor::periodic(double_sine)),
            Waveform::CosineWell => Ok(Functor::periodic(cosine_well)),
            Waveform::Wave { coefficients, normalize } => {
                Functor::wave(scaled_wave, coefficients.clone(), *normalize)
            }
            Waveform::InPhaseWave { coefficients, normalize } => {
                Functor::wave(scaled_in_phase_wave, coefficients.clone(), *normalize)
            }
        }
    }
}
