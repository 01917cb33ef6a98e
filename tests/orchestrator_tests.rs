#![cfg(feature = "runtime")]

//! Orchestrator and session behavior against a recording host, on paused
//! tokio time.

use std::sync::Arc;
use std::time::Duration;

use living_graph_core::dsp::clock::MonotonicClock;
use living_graph_core::error::{ConfigError, LivingGraphError};
use living_graph_core::host::Host;
use living_graph_core::orchestrator::Orchestrator;
use living_graph_core::preset::{Catalog, ParameterKind};
use living_graph_core::session::Session;
use living_graph_core::settings::Settings;
use parking_lot::Mutex;

#[derive(Default)]
struct RecordingHost {
    applied: Mutex<Vec<(ParameterKind, f64, usize)>>,
}

impl RecordingHost {
    fn count(&self) -> usize {
        self.applied.lock().len()
    }

    fn last(&self) -> (ParameterKind, f64, usize) {
        *self.applied.lock().last().expect("nothing applied")
    }
}

impl Host for RecordingHost {
    type Target = &'static str;

    fn apply(&self, kind: ParameterKind, value: f64, targets: &[&'static str]) {
        self.applied.lock().push((kind, value, targets.len()));
    }

    fn resolve_targets(&self, include_secondary: bool) -> Vec<&'static str> {
        if include_secondary {
            vec!["graph", "localgraph"]
        } else {
            vec!["graph"]
        }
    }
}

fn orchestrator(host: &Arc<RecordingHost>) -> Orchestrator<RecordingHost> {
    Orchestrator::new(Arc::clone(host), Catalog::builtin().unwrap()).with_clock(Arc::new(MonotonicClock::new()))
}

async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn select_applies_baseline_without_starting() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();

    let applied = host.applied.lock().clone();
    assert_eq!(applied.len(), 3, "Breathing sets link strength, repel and link distance");
    assert_eq!(applied[0].0, ParameterKind::LinkStrength);
    assert!((applied[0].1 - 0.12).abs() < 1e-12);
    assert_eq!(applied[1].0, ParameterKind::RepelForce);
    assert!((applied[1].1 - 15.33).abs() < 1e-9, "repel is rescaled to [0, 20]");
    assert_eq!(applied[2].0, ParameterKind::LinkDistance);
    assert!((applied[2].1 - 124.0).abs() < 1e-9, "link distance is rescaled to [30, 500]");

    settle(1000).await;
    assert!(!orch.is_running());
    assert_eq!(host.count(), 3, "selection alone must not animate");
}

#[tokio::test(start_paused = true)]
async fn unknown_preset_keeps_previous_selection() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();
    let before = host.count();

    let err = orch.select_preset("Nope").unwrap_err();
    assert_eq!(err, ConfigError::UnknownPreset("Nope".into()));
    assert_eq!(orch.active_preset().map(|p| p.name.as_str()), Some("Breathing"));
    assert_eq!(orch.samplers().len(), 1);
    assert_eq!(host.count(), before);
}

#[tokio::test(start_paused = true)]
async fn toggle_starts_and_first_tick_is_phase_zero() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();

    orch.toggle();
    assert!(orch.is_running());
    settle(1).await;

    // 3 on select, 3 more on start, then the first tick.
    assert_eq!(host.count(), 7);
    let (kind, value, targets) = host.last();
    assert_eq!(kind, ParameterKind::CenterForce);
    assert!((value - 0.25).abs() < 1e-9, "got {value}");
    assert_eq!(targets, 2);

    // 200 ms update period.
    settle(1000).await;
    assert_eq!(host.count(), 12);
}

#[tokio::test(start_paused = true)]
async fn toggle_stop_is_debounced_and_absorbs_repeats() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();
    orch.toggle();
    settle(10).await;

    let before_stop = host.count();
    orch.toggle();
    assert!(orch.is_stopping());
    assert!(orch.is_running(), "samplers keep running through the guard delay");
    let applied = host.applied.lock()[before_stop..].to_vec();
    assert_eq!(
        applied.iter().map(|a| a.0).collect::<Vec<_>>(),
        vec![ParameterKind::LinkStrength, ParameterKind::RepelForce, ParameterKind::LinkDistance],
        "stopping re-applies the baseline"
    );

    let before_repeat = host.count();
    orch.toggle();
    assert!(orch.is_stopping(), "repeat toggle is absorbed");
    assert_eq!(host.count(), before_repeat, "absorbed toggle applies nothing");

    settle(1600).await;
    assert!(!orch.is_running());
    assert!(!orch.is_stopping());

    let stopped_at = host.count();
    settle(2000).await;
    assert_eq!(host.count(), stopped_at, "no deliveries after stop and no restart");
}

#[tokio::test(start_paused = true)]
async fn target_refresh_applies_on_next_tick() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();
    orch.toggle();
    settle(1).await;
    assert_eq!(host.last().2, 2);

    orch.set_include_secondary(false);
    settle(200).await;
    assert_eq!(host.last().2, 1);
    assert!(!orch.include_secondary());
}

#[tokio::test(start_paused = true)]
async fn change_preset_restarts_running_animation() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();
    orch.toggle();
    settle(1).await;

    orch.change_preset("Breathing Colonies").unwrap();
    assert!(orch.is_running());
    assert_eq!(orch.samplers().len(), 4);
    assert!(orch.samplers().iter().all(|s| s.is_running()));
}

#[tokio::test(start_paused = true)]
async fn change_preset_while_idle_stays_idle() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing").unwrap();
    orch.change_preset("Heart").unwrap();
    assert!(!orch.is_running());
    assert_eq!(orch.active_preset().map(|p| p.name.as_str()), Some("Heart"));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_everything() {
    let host = Arc::new(RecordingHost::default());
    let mut orch = orchestrator(&host);
    orch.select_preset("Breathing Colonies").unwrap();
    orch.toggle();
    settle(1).await;

    orch.shutdown();
    assert!(!orch.is_running());
    let count = host.count();
    settle(1000).await;
    assert_eq!(host.count(), count);
}

// ── Session ─────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn session_defaults_to_first_preset_and_persists_choice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let host = Arc::new(RecordingHost::default());

    let mut session = Session::open(Arc::clone(&host), Catalog::builtin().unwrap(), path.clone()).unwrap();
    assert_eq!(
        session.orchestrator().active_preset().map(|p| p.name.as_str()),
        Some("Breathing")
    );
    session.choose_preset("Squid").unwrap();
    session.set_include_local(false).unwrap();
    session.close();

    let saved = Settings::load(&path).unwrap();
    assert_eq!(saved.active_preset.as_deref(), Some("Squid"));
    assert!(!saved.include_local);

    let session = Session::open(host, Catalog::builtin().unwrap(), path).unwrap();
    assert_eq!(
        session.orchestrator().active_preset().map(|p| p.name.as_str()),
        Some("Squid")
    );
    assert!(!session.orchestrator().include_secondary());
}

#[tokio::test(start_paused = true)]
async fn session_falls_back_when_persisted_preset_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"activePreset": "Retired Preset"}"#).unwrap();

    let session = Session::open(
        Arc::new(RecordingHost::default()),
        Catalog::builtin().unwrap(),
        path,
    )
    .unwrap();
    assert_eq!(session.settings().active_preset.as_deref(), Some("Breathing"));
}

#[tokio::test(start_paused = true)]
async fn session_rejects_invalid_tuning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"tuning": {"maxUpdatesPerSecond": 0}}"#).unwrap();

    let result = Session::open(
        Arc::new(RecordingHost::default()),
        Catalog::builtin().unwrap(),
        path,
    );
    assert!(matches!(result, Err(LivingGraphError::Config(ConfigError::InvalidTuning(_)))));
}
