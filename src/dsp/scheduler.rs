//! Timer-driven samplers.
//!
//! A [`Sampler`] pairs an [`Evaluator`] with a delivery callback and a
//! repeating tokio timer. Each tick reads the shared clock, evaluates the
//! waveform at the elapsed time since the aligned start, and hands the value
//! to the delivery callback together with the current target set. Ticks
//! recompute from absolute time, so missed ticks are skipped rather than
//! replayed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::clock::Clock;
use super::sampler::{Evaluator, Tuning};
use crate::error::ConfigError;
use crate::preset::IntervalConfig;
use crate::scale::ScaleTable;

/// Sink for sampled values: `(value, targets)`.
pub type Delivery<T> = Arc<dyn Fn(f64, &[T]) + Send + Sync>;

/// Delivery targets shared with running timers. Swapping the inner list
/// takes effect on the next tick.
pub type TargetSet<T> = Arc<ArcSwap<Vec<T>>>;

pub fn target_set<T>(targets: Vec<T>) -> TargetSet<T> {
    Arc::new(ArcSwap::from_pointee(targets))
}

/// One animated parameter with its timer. Cloning yields another handle to
/// the same sampler.
pub struct Sampler<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    evaluator: Arc<Evaluator>,
    delivery: Delivery<T>,
    clock: Arc<dyn Clock>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Clone for Sampler<T> {
    fn clone(&self) -> Self {
        Sampler {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Sampler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("kind", &self.inner.evaluator.kind())
            .field("plan", self.inner.evaluator.plan())
            .field("running", &self.is_running())
            .finish()
    }
}

impl<T> Sampler<T> {
    pub fn evaluator(&self) -> &Evaluator {
        &self.inner.evaluator
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .timer
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T: Send + Sync + 'static> Sampler<T> {
    pub fn new(
        config: &IntervalConfig,
        scales: &ScaleTable,
        tuning: &Tuning,
        delivery: Delivery<T>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let evaluator = Evaluator::new(config, scales, tuning)?;
        Ok(Self::from_evaluator(evaluator, delivery, clock))
    }

    pub fn from_evaluator(evaluator: Evaluator, delivery: Delivery<T>, clock: Arc<dyn Clock>) -> Self {
        Sampler {
            inner: Arc::new(Inner {
                evaluator: Arc::new(evaluator),
                delivery,
                clock,
                timer: Mutex::new(None),
            }),
        }
    }

    /// Start delivering values to `targets`. No-op while already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, targets: TargetSet<T>) {
        let mut timer = self.inner.timer.lock();
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let evaluator = Arc::clone(&self.inner.evaluator);
        evaluator.prepare();
        let delivery = Arc::clone(&self.inner.delivery);
        let clock = Arc::clone(&self.inner.clock);

        let offset = evaluator.start_offset(clock.now_ms());
        let update_period = Duration::from_secs_f64(evaluator.plan().update_period_ms / 1000.0);
        debug!(kind = %evaluator.kind(), offset_ms = offset, "starting sampler");

        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(update_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let elapsed = clock.now_ms() - offset;
                match evaluator.sample_checked(elapsed) {
                    Ok(value) => {
                        let targets = targets.load();
                        delivery(value, targets.as_slice());
                    }
                    Err(e) => warn!(kind = %evaluator.kind(), "skipping delivery: {e}"),
                }
            }
        }));
    }

    /// Cancel the timer. No-op while idle.
    pub fn stop(&self) {
        if let Some(handle) = self.inner.timer.lock().take() {
            handle.abort();
            debug!(kind = %self.inner.evaluator.kind(), "stopped sampler");
        }
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::clock::MonotonicClock;
    use crate::dsp::functor::Waveform;
    use crate::dsp::synth::Coefficients;
    use crate::preset::ParameterKind;

    type Log = Arc<Mutex<Vec<(f64, usize)>>>;

    fn recorder() -> (Delivery<u32>, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let delivery: Delivery<u32> = Arc::new(move |value: f64, targets: &[u32]| {
            sink.lock().push((value, targets.len()));
        });
        (delivery, log)
    }

    fn breathing() -> IntervalConfig {
        IntervalConfig::new(
            ParameterKind::CenterForce,
            0.25,
            0.4,
            2.0,
            Waveform::Wave {
                coefficients: Coefficients::from(&[(1.0, 0.5)][..]),
                normalize: false,
            },
        )
    }

    fn sampler(delivery: Delivery<u32>) -> Sampler<u32> {
        Sampler::new(
            &breathing(),
            &ScaleTable::default(),
            &Tuning::default(),
            delivery,
            Arc::new(MonotonicClock::new()),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn debug_output_shows_running_state() {
        let (delivery, _log) = recorder();
        let s = sampler(delivery);
        let idle = format!("{s:?}");
        assert!(idle.contains("CenterForce"), "{idle}");
        assert!(idle.contains("running: false"), "{idle}");

        s.start(target_set(vec![1]));
        assert!(format!("{s:?}").contains("running: true"));
        s.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_delivers_phase_zero_value() {
        let (delivery, log) = recorder();
        let s = sampler(delivery);
        s.start(target_set(vec![1, 2]));
        tokio::time::sleep(Duration::from_millis(1)).await;

        let log = log.lock();
        assert_eq!(log.len(), 1);
        assert!((log[0].0 - 0.25).abs() < 1e-12, "got {}", log[0].0);
        assert_eq!(log[0].1, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_update_period_until_stopped() {
        let (delivery, log) = recorder();
        let s = sampler(delivery);
        s.start(target_set(vec![1]));
        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert!(s.is_running());
        assert_eq!(log.lock().len(), 6, "5 updates/s plus the immediate tick");

        s.stop();
        assert!(!s.is_running());
        let delivered = log.lock().len();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(log.lock().len(), delivered);
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_idempotent() {
        let (delivery, log) = recorder();
        let s = sampler(delivery);
        s.stop();
        s.start(target_set(vec![1]));
        s.start(target_set(vec![1]));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(log.lock().len(), 1, "second start must not spawn another timer");
        s.stop();
        s.stop();
        assert!(!s.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn target_swap_applies_on_next_tick() {
        let (delivery, log) = recorder();
        let s = sampler(delivery);
        let targets = target_set(vec![1]);
        s.start(Arc::clone(&targets));
        tokio::time::sleep(Duration::from_millis(1)).await;
        targets.store(Arc::new(vec![1, 2, 3]));
        tokio::time::sleep(Duration::from_millis(200)).await;
        s.stop();

        let log = log.lock();
        assert_eq!(log[0].1, 1);
        assert_eq!(log.last().unwrap().1, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_finite_values_are_not_delivered() {
        use crate::dsp::functor::Functor;

        let (delivery, log) = recorder();
        let cfg = IntervalConfig::new(ParameterKind::CenterForce, 0.0, 1.0, 0.1, Waveform::Sine);
        let evaluator = Evaluator::with_functor(
            Functor::periodic(|_, _, _, _| f64::NAN),
            &cfg,
            &ScaleTable::default(),
            &Tuning::default(),
        )
        .unwrap();
        let s = Sampler::from_evaluator(evaluator, delivery, Arc::new(MonotonicClock::new()));
        s.start(target_set(vec![1]));
        tokio::time::sleep(Duration::from_millis(500)).await;
        s.stop();
        assert!(log.lock().is_empty());
    }
}
