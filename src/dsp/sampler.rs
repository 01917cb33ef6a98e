//! Sampling plans and parameter evaluation.
//!
//! An [`Evaluator`] owns everything about one animated parameter except its
//! timer: the rescaled bounds, the functor, the modifier chain and a
//! [`SamplingPlan`] derived once from the waveform period. When a period
//! holds more distinct samples than the memoization threshold, every sample
//! of one period is computed once into a read-only table and ticks become
//! lookups.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::functor::Functor;
use crate::error::{ConfigError, EvalError};
use crate::preset::{IntervalConfig, ParameterKind};
use crate::scale::ScaleTable;

// ── Tuning ──────────────────────────────────────────────────

/// Update-rate policy shared by every sampler of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    /// Minimum number of updates delivered per waveform period.
    pub desired_updates_per_period: u32,
    /// Floor on the update rate, keeps slow waveforms visibly moving.
    pub min_updates_per_second: u32,
    /// Ceiling on the update rate.
    pub max_updates_per_second: u32,
    /// Memoize when a period holds more than this many samples.
    pub memoize_threshold: usize,
    /// Largest period, in samples, a sampler may be built for.
    pub max_samples_per_period: usize,
    /// Delay before a toggle actually stops running samplers.
    pub toggle_guard_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            desired_updates_per_period: 24,
            min_updates_per_second: 5,
            max_updates_per_second: 27,
            memoize_threshold: 10,
            max_samples_per_period: 65_536,
            toggle_guard_ms: 1500,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_updates_per_second == 0 {
            return Err(ConfigError::InvalidTuning("minUpdatesPerSecond must be at least 1"));
        }
        if self.min_updates_per_second > self.max_updates_per_second {
            return Err(ConfigError::InvalidTuning(
                "minUpdatesPerSecond exceeds maxUpdatesPerSecond",
            ));
        }
        Ok(())
    }
}

// ── Sampling plan ───────────────────────────────────────────

/// Timer sizing derived from a waveform period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingPlan {
    /// Period magnitude in milliseconds.
    pub period_ms: f64,
    pub updates_per_second: u32,
    pub update_period_ms: f64,
    /// Distinct samples per period.
    pub sample_count: usize,
    pub memoized: bool,
}

impl SamplingPlan {
    /// Choose the smallest update rate giving `desired_updates_per_period`
    /// updates per period, clamped to the tuning's rate bounds.
    pub fn derive(period_ms: f64, tuning: &Tuning) -> Self {
        let period_ms = period_ms.abs();
        let wanted = (1000.0 * f64::from(tuning.desired_updates_per_period) / period_ms).ceil();
        let updates_per_second = wanted
            .max(f64::from(tuning.min_updates_per_second))
            .min(f64::from(tuning.max_updates_per_second)) as u32;
        let update_period_ms = 1000.0 / f64::from(updates_per_second);
        let sample_count = (period_ms / update_period_ms).ceil() as usize;

        SamplingPlan {
            period_ms,
            updates_per_second,
            update_period_ms,
            sample_count,
            memoized: sample_count > tuning.memoize_threshold,
        }
    }
}

// ── Evaluator ───────────────────────────────────────────────

/// Immutable per-parameter evaluation state.
#[derive(Debug)]
pub struct Evaluator {
    kind: ParameterKind,
    functor: Functor,
    lower: f64,
    upper: f64,
    inversion_center: f64,
    time_dilation: f64,
    relative_offset: f64,
    invert: bool,
    multiplier: Option<f64>,
    vertical_offset: f64,
    prevent_clamp: bool,
    plan: SamplingPlan,
    table: OnceLock<Vec<f64>>,
}

impl Evaluator {
    /// Validate `config`, build its functor, and derive the sampling plan.
    pub fn new(config: &IntervalConfig, scales: &ScaleTable, tuning: &Tuning) -> Result<Self, ConfigError> {
        let functor = config.waveform.build()?;
        Self::with_functor(functor, config, scales, tuning)
    }

    /// Like [`Evaluator::new`] but with a caller-supplied functor; the
    /// config's waveform descriptor is ignored.
    pub fn with_functor(
        functor: Functor,
        config: &IntervalConfig,
        scales: &ScaleTable,
        tuning: &Tuning,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        check_finite("lower", config.lower)?;
        check_finite("upper", config.upper)?;
        check_finite("timeDilation", config.time_dilation)?;
        check_finite("relativeOffset", config.relative_offset.unwrap_or(0.0))?;
        check_finite("multiplier", config.multiplier.unwrap_or(0.0))?;
        check_finite("verticalOffset", config.vertical_offset.unwrap_or(0.0))?;
        if config.time_dilation == 0.0 {
            return Err(ConfigError::ZeroTimeDilation);
        }

        let (lower, upper) = scales.rescale_bounds(config.kind, config.lower, config.upper);
        check_finite("lower", lower)?;
        check_finite("upper", upper)?;
        if lower > upper {
            return Err(ConfigError::InvertedBounds { lower, upper });
        }

        let period_ms = functor.period(config.time_dilation) * 1000.0;
        let plan = SamplingPlan::derive(period_ms, tuning);
        if plan.sample_count > tuning.max_samples_per_period {
            return Err(ConfigError::PeriodTooLong {
                sample_count: plan.sample_count,
                limit: tuning.max_samples_per_period,
            });
        }
        debug!(
            kind = %config.kind,
            period_ms = plan.period_ms,
            updates_per_second = plan.updates_per_second,
            sample_count = plan.sample_count,
            memoized = plan.memoized,
            "derived sampling plan"
        );

        Ok(Evaluator {
            kind: config.kind,
            functor,
            lower,
            upper,
            inversion_center: (lower + upper) / 2.0,
            time_dilation: config.time_dilation,
            relative_offset: config.relative_offset.unwrap_or(0.0),
            invert: config.invert,
            multiplier: config.multiplier,
            vertical_offset: config.vertical_offset.unwrap_or(0.0),
            prevent_clamp: config.prevent_clamp,
            plan,
            table: OnceLock::new(),
        })
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn plan(&self) -> &SamplingPlan {
        &self.plan
    }

    /// Rescaled `(lower, upper)` bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn inversion_center(&self) -> f64 {
        self.inversion_center
    }

    /// Compute the value at `time_ms` directly from the functor.
    ///
    /// Modifiers apply in a fixed order: invert, multiplier, vertical
    /// offset, then clamp.
    pub fn evaluate(&self, time_ms: f64) -> f64 {
        let phase = time_ms / (self.time_dilation * 1000.0);
        let mut value = self
            .functor
            .call(phase, self.lower, self.upper, self.plan.update_period_ms);

        if self.invert {
            value = self.inversion_center + (self.inversion_center - value);
        }
        if let Some(multiplier) = self.multiplier {
            value = (value - self.inversion_center) * multiplier + self.inversion_center;
        }
        value += self.vertical_offset;

        if self.prevent_clamp {
            value
        } else {
            value.clamp(self.lower, self.upper)
        }
    }

    /// The precomputed samples of one period, built on first access.
    /// `None` for live evaluators.
    pub fn table(&self) -> Option<&[f64]> {
        if !self.plan.memoized {
            return None;
        }
        Some(self.table.get_or_init(|| self.build_table()).as_slice())
    }

    fn build_table(&self) -> Vec<f64> {
        debug!(kind = %self.kind, samples = self.plan.sample_count, "memoizing period");
        (0..self.plan.sample_count)
            .map(|i| self.evaluate(i as f64 * self.plan.update_period_ms))
            .collect()
    }

    /// Look `time_ms` up in the memo table by its slot within the period.
    pub fn lookup(&self, time_ms: f64) -> f64 {
        let table = self.table.get_or_init(|| self.build_table());
        let within = time_ms.rem_euclid(self.plan.period_ms);
        let slot = (within / self.plan.update_period_ms).floor() as usize;
        table.get(slot).or(table.last()).copied().unwrap_or(f64::NAN)
    }

    /// Value at `time_ms` on this evaluator's committed path.
    pub fn sample(&self, time_ms: f64) -> f64 {
        if self.plan.memoized {
            self.lookup(time_ms)
        } else {
            self.evaluate(time_ms)
        }
    }

    /// [`Evaluator::sample`], rejecting non-finite results.
    pub fn sample_checked(&self, time_ms: f64) -> Result<f64, EvalError> {
        let value = self.sample(time_ms);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite { time_ms, value })
        }
    }

    /// Force the memo table into existence so the first tick stays cheap.
    pub fn prepare(&self) {
        let _ = self.table();
    }

    /// Offset subtracted from clock readings so that phase 0 lines up with
    /// whole periods of the clock, shifted by the relative offset.
    pub fn start_offset(&self, now_ms: f64) -> f64 {
        now_ms.rem_euclid(self.plan.period_ms) + self.relative_offset * self.plan.period_ms
    }
}

/// Serializable snapshot of an evaluator for display and the WASM host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerReport {
    pub kind: ParameterKind,
    pub lower: f64,
    pub upper: f64,
    pub plan: SamplingPlan,
    /// One period of values at update-period spacing.
    pub samples: Vec<f64>,
}

impl Evaluator {
    /// Values at `i * update_period_ms` for every slot of one period.
    /// Memoized evaluators return their table.
    pub fn period_samples(&self) -> Vec<f64> {
        match self.table() {
            Some(table) => table.to_vec(),
            None => self.build_table(),
        }
    }

    pub fn report(&self) -> SamplerReport {
        SamplerReport {
            kind: self.kind,
            lower: self.lower,
            upper: self.upper,
            plan: self.plan,
            samples: self.period_samples(),
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}
