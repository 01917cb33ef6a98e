//! Read-only table of named presets.
//!
//! The built-in catalog is embedded as JSON and parsed once at startup;
//! hosts may also load their own catalog file in the same format.

use std::collections::HashSet;
use std::path::Path;

use super::types::Preset;
use crate::dsp::sampler::{Evaluator, Tuning};
use crate::error::{CatalogError, ConfigError};
use crate::scale::ScaleTable;

const BUILTIN_JSON: &str = include_str!("builtin.json");

/// Ordered, immutable list of presets with unique names.
#[derive(Debug, Clone)]
pub struct Catalog {
    presets: Vec<Preset>,
}

impl Catalog {
    pub fn new(presets: Vec<Preset>) -> Result<Self, ConfigError> {
        if presets.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for preset in &presets {
            if !seen.insert(preset.name.as_str()) {
                return Err(ConfigError::DuplicatePreset(preset.name.clone()));
            }
        }
        Ok(Catalog { presets })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let presets: Vec<Preset> = serde_json::from_str(json)?;
        Ok(Self::new(presets)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Like [`Catalog::get`], reporting unknown names as a configuration error.
    pub fn require(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    /// The first preset; the default selection.
    pub fn first(&self) -> &Preset {
        &self.presets[0]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Build an evaluator for every interval of the named preset.
    pub fn evaluators(&self, name: &str, scales: &ScaleTable, tuning: &Tuning) -> Result<Vec<Evaluator>, ConfigError> {
        self.require(name)?
            .intervals
            .iter()
            .map(|cfg| Evaluator::new(cfg, scales, tuning))
            .collect()
    }

    /// Check that every preset can be turned into samplers.
    pub fn validate(&self, scales: &ScaleTable, tuning: &Tuning) -> Result<(), ConfigError> {
        for preset in &self.presets {
            self.evaluators(&preset.name, scales, tuning)?;
        }
        Ok(())
    }
}
