//! Maps abstract `[0, 1]` values onto each parameter's native range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::preset::ParameterKind;

/// Native `[low, high]` range per parameter kind. Kinds without an entry map
/// onto `[0, 1]`, i.e. they are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleTable {
    ranges: BTreeMap<ParameterKind, (f64, f64)>,
}

impl Default for ScaleTable {
    fn default() -> Self {
        ScaleTable::identity()
            .with(ParameterKind::RepelForce, 0.0, 20.0)
            .with(ParameterKind::LinkDistance, 30.0, 500.0)
    }
}

impl ScaleTable {
    /// A table with no entries.
    pub fn identity() -> Self {
        ScaleTable {
            ranges: BTreeMap::new(),
        }
    }

    pub fn with(mut self, kind: ParameterKind, low: f64, high: f64) -> Self {
        self.ranges.insert(kind, (low, high));
        self
    }

    pub fn range(&self, kind: ParameterKind) -> (f64, f64) {
        self.ranges.get(&kind).copied().unwrap_or((0.0, 1.0))
    }

    /// Map a single abstract value into native units.
    pub fn rescale(&self, kind: ParameterKind, value: f64) -> f64 {
        let (low, high) = self.range(kind);
        low + value * (high - low)
    }

    /// Map an abstract `[lower, upper]` interval into native units.
    pub fn rescale_bounds(&self, kind: ParameterKind, lower: f64, upper: f64) -> (f64, f64) {
        (self.rescale(kind, lower), self.rescale(kind, upper))
    }
}
