pub mod dsp;
pub mod error;
pub mod preset;
pub mod scale;

#[cfg(feature = "runtime")]
pub mod host;
#[cfg(feature = "runtime")]
pub mod orchestrator;
#[cfg(feature = "runtime")]
pub mod session;
#[cfg(feature = "runtime")]
pub mod settings;

use crate::dsp::sampler::{SamplerReport, Tuning};
use crate::error::LivingGraphError;
use crate::preset::Catalog;
use crate::scale::ScaleTable;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the living-graph-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Build a report for every sampler of the named built-in preset, using the
/// default rescale table and tuning.
pub fn describe_preset(name: &str) -> Result<Vec<SamplerReport>, LivingGraphError> {
    let catalog = Catalog::builtin()?;
    let evaluators = catalog.evaluators(name, &ScaleTable::default(), &Tuning::default())?;
    Ok(evaluators.iter().map(|e| e.report()).collect())
}

/// WASM-exposed: names of the built-in presets, in catalog order.
#[wasm_bindgen]
pub fn preset_names() -> Result<JsValue, JsValue> {
    let catalog = Catalog::builtin().map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let names: Vec<&str> = catalog.names().collect();
    serde_wasm_bindgen::to_value(&names).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: sampling plans and one period of samples for a built-in
/// preset, so a JavaScript host can drive its own timers.
#[wasm_bindgen]
pub fn preset_plan(name: &str) -> Result<JsValue, JsValue> {
    let reports = describe_preset(name).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&reports).map_err(|e| JsValue::from_str(&format!("{e}")))
}
