//! Orchestrator — owns the samplers of the selected preset.
//!
//! Selecting a preset replaces the whole sampler set and applies its
//! baseline values; animation only begins on [`Orchestrator::toggle`] (or
//! [`Orchestrator::start`]). All samplers share one clock so presets started
//! at different moments stay phase-aligned.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dsp::clock::{Clock, SystemClock};
use crate::dsp::sampler::Tuning;
use crate::dsp::scheduler::{Delivery, Sampler, TargetSet, target_set};
use crate::error::ConfigError;
use crate::host::Host;
use crate::preset::{Catalog, Preset};
use crate::scale::ScaleTable;

pub struct Orchestrator<H: Host> {
    host: Arc<H>,
    catalog: Catalog,
    scales: ScaleTable,
    tuning: Tuning,
    clock: Arc<dyn Clock>,
    include_secondary: bool,
    active: Option<usize>,
    samplers: Vec<Sampler<H::Target>>,
    targets: TargetSet<H::Target>,
    pending_stop: Option<JoinHandle<()>>,
}

impl<H: Host> Orchestrator<H> {
    pub fn new(host: Arc<H>, catalog: Catalog) -> Self {
        Orchestrator {
            host,
            catalog,
            scales: ScaleTable::default(),
            tuning: Tuning::default(),
            clock: Arc::new(SystemClock::new()),
            include_secondary: true,
            active: None,
            samplers: Vec::new(),
            targets: target_set(Vec::new()),
            pending_stop: None,
        }
    }

    pub fn with_scales(mut self, scales: ScaleTable) -> Self {
        self.scales = scales;
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_include_secondary(mut self, include_secondary: bool) -> Self {
        self.include_secondary = include_secondary;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn active_preset(&self) -> Option<&Preset> {
        self.active.map(|i| &self.catalog.presets()[i])
    }

    pub fn samplers(&self) -> &[Sampler<H::Target>] {
        &self.samplers
    }

    pub fn include_secondary(&self) -> bool {
        self.include_secondary
    }

    /// True while any sampler's timer is active.
    pub fn is_running(&self) -> bool {
        self.samplers.iter().any(Sampler::is_running)
    }

    /// True while a debounced stop is waiting out its guard delay.
    pub fn is_stopping(&self) -> bool {
        self.pending_stop
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Replace the active sampler set with one built from `name`.
    ///
    /// Every sampler is constructed before anything is torn down, so an
    /// unknown name or a bad configuration leaves the previous selection in
    /// place. Baseline values are applied immediately; animation is not
    /// started.
    pub fn select_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        let (index, samplers) = match self.build_samplers(name) {
            Ok(built) => built,
            Err(e) => {
                warn!(preset = name, "rejected preset selection: {e}");
                return Err(e);
            }
        };

        self.stop();
        self.samplers = samplers;
        self.active = Some(index);
        self.refresh_targets();
        self.apply_baseline();
        info!(preset = name, samplers = self.samplers.len(), "selected preset");
        Ok(())
    }

    fn build_samplers(&self, name: &str) -> Result<(usize, Vec<Sampler<H::Target>>), ConfigError> {
        let index = self
            .catalog
            .presets()
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;

        let samplers = self.catalog.presets()[index]
            .intervals
            .iter()
            .map(|cfg| {
                let host = Arc::clone(&self.host);
                let kind = cfg.kind;
                let delivery: Delivery<H::Target> =
                    Arc::new(move |value: f64, targets: &[H::Target]| host.apply(kind, value, targets));
                Sampler::new(cfg, &self.scales, &self.tuning, delivery, Arc::clone(&self.clock))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((index, samplers))
    }

    /// Push the active preset's baseline values to the current targets.
    pub fn apply_baseline(&self) {
        let Some(preset) = self.active_preset() else {
            return;
        };
        let targets = self.targets.load();
        for (kind, value) in preset.baseline.values() {
            let native = self.scales.rescale(kind, value);
            debug!(%kind, value = native, "applying baseline");
            self.host.apply(kind, native, targets.as_slice());
        }
    }

    /// Host command: stop running samplers after the guard delay, or start
    /// idle ones. Both paths first re-apply the baseline. A toggle that
    /// arrives while a stop is pending is absorbed.
    pub fn toggle(&mut self) {
        if self.is_stopping() {
            debug!("toggle absorbed by pending stop");
            return;
        }

        if self.is_running() {
            self.apply_baseline();
            let samplers = self.samplers.clone();
            let guard = Duration::from_millis(self.tuning.toggle_guard_ms);
            info!(guard_ms = self.tuning.toggle_guard_ms, "stopping animation");
            self.pending_stop = Some(tokio::spawn(async move {
                tokio::time::sleep(guard).await;
                for sampler in &samplers {
                    sampler.stop();
                }
            }));
        } else {
            self.start();
        }
    }

    /// Apply the baseline and start every sampler against the current targets.
    pub fn start(&mut self) {
        if self.active.is_none() {
            warn!("no preset selected; nothing to start");
            return;
        }
        self.apply_baseline();
        for sampler in &self.samplers {
            sampler.start(Arc::clone(&self.targets));
        }
        info!(samplers = self.samplers.len(), "started animation");
    }

    /// Stop every sampler immediately and cancel any pending debounced stop.
    pub fn stop(&mut self) {
        if let Some(pending) = self.pending_stop.take() {
            pending.abort();
        }
        for sampler in &self.samplers {
            sampler.stop();
        }
    }

    /// Re-resolve delivery targets from the host. Running samplers pick the
    /// new set up on their next tick.
    pub fn refresh_targets(&self) {
        let targets = self.host.resolve_targets(self.include_secondary);
        debug!(count = targets.len(), "refreshed delivery targets");
        self.targets.store(Arc::new(targets));
    }

    pub fn set_include_secondary(&mut self, include_secondary: bool) {
        self.include_secondary = include_secondary;
        self.refresh_targets();
    }

    /// User-driven preset change: select `name` and, if animation was
    /// running, restart it on the new samplers.
    pub fn change_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        let was_running = self.is_running() && !self.is_stopping();
        self.select_preset(name)?;
        if was_running {
            self.start();
        }
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.stop();
        info!("orchestrator shut down");
    }
}

impl<H: Host> Drop for Orchestrator<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
