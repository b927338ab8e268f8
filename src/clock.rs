//! Flight Clock
//!
//! Counts flight seconds while the motors run. Each run is tagged with a
//! generation token taken at takeoff; a tick only counts if its token is
//! still the current generation, so a late tick from a flight that already
//! landed never leaks into the next one.

use crate::protocol::SharedFlightState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::debug;

pub struct FlightClock {
    state: SharedFlightState,
    period: Duration,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FlightClock {
    pub fn new(state: SharedFlightState, period: Duration) -> Self {
        Self {
            state,
            period,
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Start a new run, replacing any previous one. Returns its token.
    ///
    /// Callers holding the flight state lock may call this; the tick task
    /// re-checks its token under that same lock.
    pub async fn start(&self) -> u64 {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut slot = self.task.lock().await;
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let state = self.state.clone();
        let generation = self.generation.clone();
        let period = self.period;

        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);

            loop {
                ticker.tick().await;

                let mut state = state.lock().await;
                if generation.load(Ordering::SeqCst) != token {
                    debug!("[CLOCK] Dropping stale tick from generation {}", token);
                    break;
                }
                if state.motors_engaged {
                    state.flight_time_sec += 1;
                }
            }
        }));

        debug!("[CLOCK] Flight clock started (generation {})", token);
        token
    }

    /// Invalidate the current run and cancel its task
    pub async fn stop(&self) {
        let invalidated = self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(task) = self.task.lock().await.take() {
            task.abort();
            debug!("[CLOCK] Flight clock stopped (generation {})", invalidated);
        }
    }

    /// Check if a run is active
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}
