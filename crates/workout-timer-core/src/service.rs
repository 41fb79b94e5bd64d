//! Timer service: the process-wide supervisor that drives the engine.
//!
//! The engine itself is a synchronous state machine; this service gives it a
//! clock. One `TimerService` instance exists per host process, created by the
//! caller and handed the cue channel explicitly. It spawns a one-second tick
//! task while a run is active, publishes an immutable snapshot after every
//! committed change, and holds the host's keep-alive resource through a
//! [`WakeLock`].
//!
//! Command handlers and the tick task may run on different threads; both go
//! through the same mutex, so a `stop()` and an in-flight tick can never
//! interleave and resurrect state after the reset. Snapshots are published
//! while the lock is held, so observers see them in commit order.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::cue::CueSender;
use crate::error::EngineError;
use crate::preset::TimerPreset;
use crate::timer::{EngineState, TimerEngine};

/// The host's keep-alive resource, acquired once per run and released when the
/// run stops or completes. `release` must tolerate being called when nothing
/// is held.
pub trait WakeLock: Send + Sync {
    fn acquire(&self);
    fn release(&self);
}

/// Default wake lock for hosts with nothing to keep awake.
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// Supervisor owning the engine, its tick cadence, and the snapshot stream.
pub struct TimerService {
    engine: Arc<Mutex<TimerEngine>>,
    snapshot_tx: Arc<watch::Sender<EngineState>>,
    cue_tx: CueSender,
    wake_lock: Arc<dyn WakeLock>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl TimerService {
    /// Create a service with no wake lock. Must be called inside a tokio
    /// runtime; the tick task is spawned on it.
    pub fn new(cue_tx: CueSender) -> Self {
        Self::with_wake_lock(cue_tx, Arc::new(NoopWakeLock))
    }

    pub fn with_wake_lock(cue_tx: CueSender, wake_lock: Arc<dyn WakeLock>) -> Self {
        let (snapshot_tx, _) = watch::channel(EngineState::default());
        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new())),
            snapshot_tx: Arc::new(snapshot_tx),
            cue_tx,
            wake_lock,
            tick_task: Mutex::new(None),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to the snapshot stream. Receivers always observe the latest
    /// committed snapshot and never a live alias of engine state.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> EngineState {
        self.lock_engine().snapshot()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a run. Rejected while another run is active.
    ///
    /// # Errors
    /// Returns [`EngineError::AlreadyRunning`] if a run is in progress.
    pub fn start(&self, preset: &TimerPreset) -> Result<(), EngineError> {
        {
            let mut engine = self.lock_engine();
            engine.start(preset)?;
            self.snapshot_tx.send_replace(engine.snapshot());
        }
        self.wake_lock.acquire();
        self.spawn_tick_task();
        Ok(())
    }

    /// Freeze advancement. The tick cadence keeps running so resume continues
    /// on the same wall-clock grid; paused ticks are no-ops.
    pub fn pause(&self) {
        let mut engine = self.lock_engine();
        if engine.pause() {
            self.snapshot_tx.send_replace(engine.snapshot());
        }
    }

    /// Continue from the frozen state, restarting the tick task if it is gone
    /// (e.g. the service was rebuilt after a host rebind). No seconds are
    /// replayed or fast-forwarded.
    pub fn resume(&self) {
        let running = {
            let mut engine = self.lock_engine();
            if engine.resume() {
                self.snapshot_tx.send_replace(engine.snapshot());
            }
            engine.state().running
        };
        if running && !self.tick_task_alive() {
            self.spawn_tick_task();
        }
    }

    /// Cancel the run: stop the tick task, reset to idle, release the wake
    /// lock. Safe from any state.
    pub fn stop(&self) {
        if let Some(task) = self.tick_task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            task.abort();
        }
        {
            // Taking the engine lock after the abort: a tick that already
            // holds it commits its second (stop had not happened yet), then
            // we reset; a tick that has not locked yet observes the reset
            // and never applies its advancement.
            let mut engine = self.lock_engine();
            engine.stop();
            self.snapshot_tx.send_replace(engine.snapshot());
        }
        self.wake_lock.release();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn lock_engine(&self) -> MutexGuard<'_, TimerEngine> {
        // The engine never panics mid-tick, but a poisoned lock should not
        // take the whole service down with it.
        self.engine.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn tick_task_alive(&self) -> bool {
        self.tick_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    fn spawn_tick_task(&self) {
        let engine = Arc::clone(&self.engine);
        let snapshot_tx = Arc::clone(&self.snapshot_tx);
        let cue_tx = self.cue_tx.clone();
        let wake_lock = Arc::clone(&self.wake_lock);

        let task = tokio::spawn(async move {
            // First fire one second from now; start() already published the
            // initial snapshot.
            let mut interval =
                time::interval_at(Instant::now() + Duration::from_secs(1), Duration::from_secs(1));
            loop {
                interval.tick().await;
                let complete = {
                    let mut engine = engine.lock().unwrap_or_else(|e| e.into_inner());
                    if !engine.state().running {
                        break;
                    }
                    let cues = engine.tick();
                    snapshot_tx.send_replace(engine.snapshot());
                    // Fire-and-forget: a full or closed channel drops the
                    // cue rather than delaying the cadence.
                    for cue in cues {
                        let _ = cue_tx.try_send(cue);
                    }
                    engine.state().complete
                };
                if complete {
                    wake_lock.release();
                    break;
                }
            }
        });
        *self.tick_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        if let Some(task) = self.tick_task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            task.abort();
        }
        self.wake_lock.release();
    }
}
