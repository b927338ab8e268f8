//! Command server - the single worker that services the command port

use crate::clock::FlightClock;
use crate::command::{CommandExecutor, CommandLine};
use crate::config::EmulatorConfig;
use crate::protocol::{codec, protocol, shared_state, CommandOutcome, FlightState, SharedFlightState};
use crate::session::SessionRegistry;
use crate::telemetry::TelemetryBroadcaster;
use crate::transport::DatagramTransport;
use anyhow::Result;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Owns the flight state and every component that works on it
pub struct CommandServer {
    config: EmulatorConfig,
    transport: Arc<dyn DatagramTransport>,
    executor: CommandExecutor,
    registry: Arc<SessionRegistry>,
    broadcaster: TelemetryBroadcaster,
}

impl CommandServer {
    /// Build a server around a bound transport, with a freshly booted drone
    pub fn new(config: EmulatorConfig, transport: Arc<dyn DatagramTransport>) -> Self {
        let state = shared_state(FlightState::new());
        let clock = Arc::new(FlightClock::new(state.clone(), config.flight_clock_period));
        let executor = CommandExecutor::new(state.clone(), clock, config.land_delay);
        let registry = Arc::new(SessionRegistry::new(config.session_timeout));
        let broadcaster = TelemetryBroadcaster::new(
            state,
            registry.clone(),
            transport.clone(),
            config.telemetry_interval,
        );

        Self {
            config,
            transport,
            executor,
            registry,
            broadcaster,
        }
    }

    pub fn state(&self) -> &SharedFlightState {
        self.executor.state()
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn clock(&self) -> &Arc<FlightClock> {
        self.executor.clock()
    }

    pub fn broadcaster(&self) -> &TelemetryBroadcaster {
        &self.broadcaster
    }

    /// Service the command port until `shutdown` flips or the socket fails
    /// for good. Errors a departed peer can cause are logged and skipped.
    ///
    /// Datagrams are handled strictly one at a time. While a handler waits
    /// (`land`) or the post-`wifi` pause runs, nothing else is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut buf = vec![0u8; protocol::MAX_DATAGRAM_SIZE];

        info!(
            "[SERVER] Command worker listening on {} ({})",
            self.transport.local_addr()?,
            self.transport.name()
        );

        loop {
            let (n, peer) = tokio::select! {
                _ = shutdown.changed() => break,
                received = self.transport.recv_from(&mut buf) => match received {
                    Ok(received) => received,
                    Err(e) if is_transient(&e) => {
                        warn!("[SERVER] Ignoring receive error: {}", e);
                        continue;
                    }
                    Err(e) => {
                        error!("[SERVER] Receive failed: {}", e);
                        return Err(e);
                    }
                },
            };

            if let Some(pause) = self.handle_datagram(&buf[..n], peer).await {
                debug!("[SERVER] Pausing command processing for {}ms", pause.as_millis());
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        info!("[SERVER] Command worker stopped");
        Ok(())
    }

    /// Interpret one datagram and send the reply.
    ///
    /// Returns the pause to observe before the next datagram, if any.
    pub async fn handle_datagram(&self, payload: &[u8], peer: SocketAddr) -> Option<Duration> {
        let command = CommandLine::from_datagram(payload);
        let outcome = match &command {
            Some(command) => self.executor.execute(command).await,
            None => CommandOutcome::Error,
        };

        let text = String::from_utf8_lossy(payload);
        info!(
            "[SERVER] Remote command from {}: {:?}, response: {:?}",
            peer,
            text.trim_end(),
            outcome.wire_text()
        );

        if let Some(reply) = codec::encode_response(&outcome) {
            if let Err(e) = self.transport.send_to(&reply, peer).await {
                warn!("[SERVER] Failed to reply to {}: {}", peer, e);
            }
        }

        if !outcome.is_ok() {
            return None;
        }

        match command.as_ref().map(|c| c.verb.as_str()) {
            Some(protocol::HANDSHAKE_VERB) => {
                self.open_channel(peer).await;
                None
            }
            Some(protocol::WIFI_VERB) => {
                self.close_all_channels().await;
                Some(self.config.wifi_reconfigure_delay)
            }
            _ => None,
        }
    }

    async fn open_channel(&self, peer: SocketAddr) {
        if self.registry.touch(peer).await {
            info!("[SERVER] Command channel established with {}", peer);
            self.broadcaster.ensure_running().await;
        } else {
            debug!("[SERVER] Command channel with {} refreshed", peer);
        }
    }

    async fn close_all_channels(&self) {
        self.registry.clear().await;
        self.broadcaster.stop().await;
    }

    /// Reboot the drone: reset the flight state and drop every channel
    pub async fn reboot(&self) {
        {
            let mut state = self.state().lock().await;
            state.reset();
            self.clock().stop().await;
        }
        self.close_all_channels().await;
        info!("[SERVER] Drone state reset");
    }

    /// Stop both periodic tasks
    pub async fn shutdown(&self) {
        self.broadcaster.stop().await;
        self.clock().stop().await;
    }
}

/// Receive errors that leave the socket usable, such as an ICMP port
/// unreachable from a client that went away
fn is_transient(error: &anyhow::Error) -> bool {
    error.downcast_ref::<io::Error>().is_some_and(|e| {
        matches!(
            e.kind(),
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::Interrupted
                | io::ErrorKind::WouldBlock
                | io::ErrorKind::TimedOut
        )
    })
}
