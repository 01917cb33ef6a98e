//! Host glue: persisted settings, an orchestrator, and the host-facing
//! commands and event hooks.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::error::{ConfigError, LivingGraphError};
use crate::host::Host;
use crate::orchestrator::Orchestrator;
use crate::preset::Catalog;
use crate::settings::Settings;

pub struct Session<H: Host> {
    orchestrator: Orchestrator<H>,
    settings: Settings,
    path: PathBuf,
}

impl<H: Host> Session<H> {
    /// Load settings from `path` and select the persisted preset.
    pub fn open(host: Arc<H>, catalog: Catalog, path: PathBuf) -> Result<Self, LivingGraphError> {
        let settings = Settings::load(&path)?;
        Self::new(Orchestrator::new(host, catalog), settings, path)
    }

    /// Apply `settings` to `orchestrator` and select the persisted preset.
    /// A persisted name missing from the catalog falls back to the first preset.
    pub fn new(orchestrator: Orchestrator<H>, mut settings: Settings, path: PathBuf) -> Result<Self, LivingGraphError> {
        settings.tuning.validate()?;
        let mut orchestrator = orchestrator
            .with_tuning(settings.tuning)
            .with_include_secondary(settings.include_local);

        let first = orchestrator.catalog().first().name.clone();
        let wanted = settings.active_preset.clone().unwrap_or_else(|| first.clone());
        match orchestrator.select_preset(&wanted) {
            Ok(()) => {}
            Err(ConfigError::UnknownPreset(name)) => {
                warn!(preset = %name, fallback = %first, "persisted preset no longer exists");
                orchestrator.select_preset(&first)?;
                settings.active_preset = Some(first);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Session {
            orchestrator,
            settings,
            path,
        })
    }

    pub fn orchestrator(&self) -> &Orchestrator<H> {
        &self.orchestrator
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The single argument-less host command.
    pub fn toggle(&mut self) {
        self.orchestrator.toggle();
    }

    /// Host layout changed: re-resolve delivery targets.
    pub fn on_layout_change(&self) {
        self.orchestrator.refresh_targets();
    }

    /// User picked a preset. Running animation restarts on the new preset
    /// and the choice is persisted.
    pub fn choose_preset(&mut self, name: &str) -> Result<(), LivingGraphError> {
        self.orchestrator.change_preset(name)?;
        self.settings.active_preset = Some(name.to_string());
        self.settings.save(&self.path)?;
        Ok(())
    }

    /// User toggled whether local graph views participate.
    pub fn set_include_local(&mut self, include_local: bool) -> Result<(), LivingGraphError> {
        self.orchestrator.set_include_secondary(include_local);
        self.settings.include_local = include_local;
        self.settings.save(&self.path)?;
        Ok(())
    }

    pub fn close(mut self) {
        self.orchestrator.shutdown();
    }
}
