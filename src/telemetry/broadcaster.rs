//! Telemetry Broadcaster
//!
//! Streams the telemetry line to every session at 10 Hz. The task starts on
//! the first handshake and stops once no session is left; the next fresh
//! handshake starts a new one.

use crate::protocol::{codec, SharedFlightState};
use crate::session::SessionRegistry;
use crate::transport::DatagramTransport;
use futures::future::join_all;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one broadcast pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Datagrams delivered to the transport
    pub sent: usize,
    /// Sessions dropped for silence
    pub expired: Vec<SocketAddr>,
    /// Sessions dropped because the send failed
    pub unreachable: Vec<SocketAddr>,
    /// Sessions left after pruning
    pub remaining: usize,
}

/// Send one telemetry datagram to every live session and prune the rest.
///
/// Removals are applied only after the whole send pass.
pub async fn broadcast_pass(
    state: &SharedFlightState,
    registry: &SessionRegistry,
    transport: &dyn DatagramTransport,
) -> BroadcastReport {
    let sessions = registry.snapshot().await;
    if sessions.is_empty() {
        return BroadcastReport::default();
    }

    let payload = {
        let state = state.lock().await;
        codec::encode_telemetry(&state)
    };

    let now = Instant::now();
    let timeout = registry.timeout();
    let live: Vec<SocketAddr> = sessions
        .iter()
        .filter(|entry| !entry.is_expired(now, timeout))
        .map(|entry| entry.endpoint)
        .collect();

    let results = join_all(live.iter().map(|endpoint| {
        let payload = &payload;
        async move { (*endpoint, transport.send_to(payload, *endpoint).await) }
    }))
    .await;

    let mut report = BroadcastReport::default();
    for (endpoint, result) in results {
        match result {
            Ok(_) => report.sent += 1,
            Err(e) => {
                warn!("[TELEMETRY] Send to {} failed: {}", endpoint, e);
                report.unreachable.push(endpoint);
            }
        }
    }

    report.expired = registry.expire(now).await;
    registry.remove(&report.unreachable).await;

    for endpoint in report.expired.iter().chain(report.unreachable.iter()) {
        info!("[TELEMETRY] Control channel with {} closed", endpoint);
    }

    report.remaining = registry.len().await;
    report
}

/// Periodic telemetry task with at most one live instance
pub struct TelemetryBroadcaster {
    state: SharedFlightState,
    registry: Arc<SessionRegistry>,
    transport: Arc<dyn DatagramTransport>,
    period: Duration,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TelemetryBroadcaster {
    pub fn new(
        state: SharedFlightState,
        registry: Arc<SessionRegistry>,
        transport: Arc<dyn DatagramTransport>,
        period: Duration,
    ) -> Self {
        Self {
            state,
            registry,
            transport,
            period,
            task: Arc::new(Mutex::new(None)),
        }
    }

    /// Start broadcasting unless already running. Returns true if a new task
    /// was started.
    pub async fn ensure_running(&self) -> bool {
        let mut slot = self.task.lock().await;
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            return false;
        }

        let state = self.state.clone();
        let registry = self.registry.clone();
        let transport = self.transport.clone();
        let task_slot = self.task.clone();
        let period = self.period;

        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval(period);

            loop {
                ticker.tick().await;

                let report = broadcast_pass(&state, &registry, transport.as_ref()).await;
                if report.remaining > 0 {
                    continue;
                }

                // Re-check under the slot lock so a handshake racing with the
                // shutdown of this task always finds either a live task or an
                // empty slot.
                let mut slot = task_slot.lock().await;
                if registry.is_empty().await {
                    slot.take();
                    break;
                }
            }

            info!("[TELEMETRY] No control channels left, telemetry stopped");
        }));

        info!(
            "[TELEMETRY] Starting telemetry transmission every {}ms",
            self.period.as_millis()
        );
        true
    }

    /// Stop broadcasting; sessions are left untouched
    pub async fn stop(&self) {
        if let Some(task) = self.task.lock().await.take() {
            task.abort();
            debug!("[TELEMETRY] Broadcaster stopped");
        }
    }

    /// Check if a broadcast task is active
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
