//! Preset data types.
//!
//! A preset (a "graph setting") is a named bundle of animated parameter
//! configurations plus optional baseline values. These types map directly to
//! the catalog JSON; values are in abstract `[0, 1]` units until a sampler
//! rescales them into the consumer's native range.

use serde::{Deserialize, Serialize};

use crate::dsp::functor::Waveform;

// ── Parameter kinds ─────────────────────────────────────────

/// The consumer parameter a sampler or baseline value drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    CenterForce,
    LinkDistance,
    LinkStrength,
    RepelForce,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 4] = [
        ParameterKind::CenterForce,
        ParameterKind::LinkDistance,
        ParameterKind::LinkStrength,
        ParameterKind::RepelForce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::CenterForce => "center-force",
            ParameterKind::LinkDistance => "link-distance",
            ParameterKind::LinkStrength => "link-strength",
            ParameterKind::RepelForce => "repel-force",
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Interval configuration ──────────────────────────────────

/// One animated parameter: bounds, time dilation, waveform and modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalConfig {
    /// Which consumer parameter receives the values.
    pub kind: ParameterKind,
    /// Lower bound in abstract units.
    pub lower: f64,
    /// Upper bound in abstract units.
    pub upper: f64,
    /// Stretches (>1) or compresses (<1) the waveform's time axis.
    /// Negative values play the waveform backwards.
    pub time_dilation: f64,
    pub waveform: Waveform,
    /// Phase shift as a fraction of the period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_offset: Option<f64>,
    /// Reflect values around the bound midpoint.
    #[serde(default, skip_serializing_if = "is_false")]
    pub invert: bool,
    /// Scale the deviation from the bound midpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    /// Additive shift in native units, applied before clamping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_offset: Option<f64>,
    /// Let values leave `[lower, upper]`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub prevent_clamp: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl IntervalConfig {
    pub fn new(kind: ParameterKind, lower: f64, upper: f64, time_dilation: f64, waveform: Waveform) -> Self {
        IntervalConfig {
            kind,
            lower,
            upper,
            time_dilation,
            waveform,
            relative_offset: None,
            invert: false,
            multiplier: None,
            vertical_offset: None,
            prevent_clamp: false,
        }
    }
}

// ── Baseline values ─────────────────────────────────────────

/// Non-animated values applied once when a preset is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_force: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repel_force: Option<f64>,
}

impl Baseline {
    /// Every value that is set, paired with its parameter kind.
    pub fn values(&self) -> impl Iterator<Item = (ParameterKind, f64)> + '_ {
        [
            (ParameterKind::CenterForce, self.center_force),
            (ParameterKind::LinkStrength, self.link_strength),
            (ParameterKind::RepelForce, self.repel_force),
            (ParameterKind::LinkDistance, self.link_distance),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| (kind, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }
}

// ── Preset ──────────────────────────────────────────────────

/// A named, ordered collection of interval configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Baseline::is_empty")]
    pub baseline: Baseline,
    pub intervals: Vec<IntervalConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::synth::Coefficients;

    #[test]
    fn interval_config_uses_camel_case_and_defaults() {
        let json = r#"{
            "kind": "repel-force",
            "lower": 0.87,
            "upper": 1,
            "timeDilation": 60,
            "relativeOffset": 0.5,
            "waveform": { "shape": "wave", "coefficients": [[3, 5], [5, 4], [7, 2]] }
        }"#;
        let cfg: IntervalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.kind, ParameterKind::RepelForce);
        assert_eq!(cfg.time_dilation, 60.0);
        assert_eq!(cfg.relative_offset, Some(0.5));
        assert!(!cfg.invert);
        assert!(!cfg.prevent_clamp);
        assert_eq!(cfg.multiplier, None);
        assert_eq!(
            cfg.waveform,
            Waveform::Wave {
                coefficients: Coefficients::from(&[(3.0, 5.0), (5.0, 4.0), (7.0, 2.0)][..]),
                normalize: true,
            }
        );
    }

    #[test]
    fn interval_config_skips_unset_modifiers() {
        let cfg = IntervalConfig::new(ParameterKind::CenterForce, 0.25, 0.4, 2.0, Waveform::Sine);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("invert"));
        assert!(!json.contains("multiplier"));
        assert!(json.contains("\"timeDilation\":2.0"));
        assert!(json.contains("\"kind\":\"center-force\""));
    }

    #[test]
    fn baseline_values_in_application_order() {
        let b = Baseline {
            center_force: Some(0.35),
            link_distance: Some(0.1),
            link_strength: Some(0.75),
            repel_force: None,
        };
        let values: Vec<_> = b.values().collect();
        assert_eq!(
            values,
            vec![
                (ParameterKind::CenterForce, 0.35),
                (ParameterKind::LinkStrength, 0.75),
                (ParameterKind::LinkDistance, 0.1),
            ]
        );
        assert!(Baseline::default().is_empty());
    }

    #[test]
    fn zero_baseline_is_still_applied() {
        let b = Baseline {
            center_force: Some(0.0),
            ..Baseline::default()
        };
        assert_eq!(b.values().count(), 1);
    }

    #[test]
    fn parameter_kind_display_matches_serde() {
        for kind in ParameterKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
