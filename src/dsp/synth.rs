//! Wave synthesizer — weighted sums of sinusoids.
//!
//! A waveform is described by an ordered list of `(frequency, amplitude)`
//! pairs and evaluated as `Σ aᵢ · base(x · fᵢ)`. With normalization on, the
//! phase is stretched by twice the total absolute amplitude and the sum is
//! mapped from `[-A, A]` into `[0, 1]`.

use serde::{Deserialize, Serialize};

// ── Coefficients ────────────────────────────────────────────

/// One term of a sum-of-sinusoids waveform. Serialized as `[frequency, amplitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coefficient {
    /// Multiplier applied to the phase before the trig base function.
    pub frequency: f64,
    /// Weight of this term in the sum. May be negative.
    pub amplitude: f64,
}

impl Coefficient {
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Coefficient { frequency, amplitude }
    }
}

impl From<(f64, f64)> for Coefficient {
    fn from((frequency, amplitude): (f64, f64)) -> Self {
        Coefficient { frequency, amplitude }
    }
}

impl From<Coefficient> for (f64, f64) {
    fn from(c: Coefficient) -> Self {
        (c.frequency, c.amplitude)
    }
}

/// Ordered coefficient list with its total absolute amplitude cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Coefficient>", into = "Vec<Coefficient>")]
pub struct Coefficients {
    pairs: Vec<Coefficient>,
    total_amplitude: f64,
}

impl Coefficients {
    pub fn new(pairs: Vec<Coefficient>) -> Self {
        let total_amplitude = pairs.iter().map(|c| c.amplitude.abs()).sum();
        Coefficients { pairs, total_amplitude }
    }

    pub fn pairs(&self) -> &[Coefficient] {
        &self.pairs
    }

    /// Sum of `|amplitude|` over every pair.
    pub fn total_amplitude(&self) -> f64 {
        self.total_amplitude
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl From<Vec<Coefficient>> for Coefficients {
    fn from(pairs: Vec<Coefficient>) -> Self {
        Coefficients::new(pairs)
    }
}

impl From<Coefficients> for Vec<Coefficient> {
    fn from(c: Coefficients) -> Self {
        c.pairs
    }
}

impl From<&[(f64, f64)]> for Coefficients {
    fn from(pairs: &[(f64, f64)]) -> Self {
        Coefficients::new(pairs.iter().copied().map(Coefficient::from).collect())
    }
}

// ── Synthesis ───────────────────────────────────────────────

/// Sum `amplitude · base(phase · frequency)` over all pairs.
///
/// When `normalize` is set the caller must guarantee a nonzero total
/// amplitude; `Functor` rejects such lists at construction.
pub fn synthesize(base: fn(f64) -> f64, phase: f64, coefficients: &Coefficients, normalize: bool) -> f64 {
    let total = coefficients.total_amplitude();
    debug_assert!(!normalize || total > 0.0, "normalized synthesis over zero amplitude");

    let x = if normalize { phase * total * 2.0 } else { phase };
    let sum: f64 = coefficients
        .pairs()
        .iter()
        .map(|c| c.amplitude * base(x * c.frequency))
        .sum();

    if normalize {
        (sum / total + 1.0) / 2.0
    } else {
        sum
    }
}

/// Sine-based synthesis.
pub fn wave(phase: f64, coefficients: &Coefficients, normalize: bool) -> f64 {
    synthesize(f64::sin, phase, coefficients, normalize)
}

/// Cosine-based ("in-phase") synthesis.
pub fn in_phase_wave(phase: f64, coefficients: &Coefficients, normalize: bool) -> f64 {
    synthesize(f64::cos, phase, coefficients, normalize)
}
