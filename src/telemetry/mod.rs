//! Telemetry streaming to every open control channel

mod broadcaster;

pub use broadcaster::TelemetryBroadcaster;
