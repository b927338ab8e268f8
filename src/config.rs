//! Emulator configuration

use crate::protocol::protocol;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Environment variable overriding the command socket address
pub const BIND_ADDR_ENV: &str = "TELLO_EMULATOR_ADDR";

/// Timing and addressing for one emulator instance
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// Address the command socket binds to
    pub bind_addr: SocketAddr,
    /// Telemetry broadcast period
    pub telemetry_interval: Duration,
    /// Control channels silent for longer than this are dropped
    pub session_timeout: Duration,
    /// Flight clock period
    pub flight_clock_period: Duration,
    /// Descent time for `land`
    pub land_delay: Duration,
    /// Pause after replying to `wifi`
    pub wifi_reconfigure_delay: Duration,
    /// How long shutdown waits for the command worker before abandoning it
    pub shutdown_timeout: Duration,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, protocol::DEFAULT_COMMAND_PORT)),
            telemetry_interval: Duration::from_millis(protocol::TELEMETRY_INTERVAL_MS),
            session_timeout: Duration::from_millis(protocol::SESSION_TIMEOUT_MS),
            flight_clock_period: Duration::from_millis(protocol::FLIGHT_CLOCK_PERIOD_MS),
            land_delay: Duration::from_millis(protocol::LAND_DELAY_MS),
            wifi_reconfigure_delay: Duration::from_millis(protocol::WIFI_RECONFIGURE_DELAY_MS),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl EmulatorConfig {
    /// Defaults, with the bind address taken from the environment when set
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            config.bind_addr = addr
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {} '{}': {}", BIND_ADDR_ENV, addr, e))?;
        }
        Ok(config)
    }
}
