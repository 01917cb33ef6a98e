//! Host integration surface.
//!
//! The host owns the rendering surfaces. The orchestrator only asks it for
//! the current delivery targets and forwards values tagged with their
//! parameter kind; it never sees the host's own event system.

use crate::preset::ParameterKind;

/// Everything the orchestrator needs from the embedding application.
pub trait Host: Send + Sync + 'static {
    /// Opaque handle to one rendering surface.
    type Target: Send + Sync + 'static;

    /// Apply a native-unit value for `kind` to every target.
    fn apply(&self, kind: ParameterKind, value: f64, targets: &[Self::Target]);

    /// Current delivery targets. `include_secondary` adds the secondary
    /// target class (local graph views) to the primary one.
    fn resolve_targets(&self, include_secondary: bool) -> Vec<Self::Target>;
}
