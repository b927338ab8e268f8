//! Tello Emulator Shared Protocol Types
//!
//! This crate provides the flight state model, the command outcome type and
//! the text codec shared by the command server, the telemetry broadcaster and
//! the operator console.

pub mod codec;
pub mod state;

pub use state::{Field, FieldError, FlightState, Vector3};

/// Wire protocol parameters
pub mod protocol {
    /// UDP port the drone listens on for commands
    pub const DEFAULT_COMMAND_PORT: u16 = 8889;

    /// Largest command datagram accepted
    pub const MAX_DATAGRAM_SIZE: usize = 1024;

    /// Telemetry broadcast period in milliseconds (10 Hz)
    pub const TELEMETRY_INTERVAL_MS: u64 = 100;

    /// A control channel silent for longer than this is dropped
    pub const SESSION_TIMEOUT_MS: u64 = 60_000;

    /// Flight clock period in milliseconds
    pub const FLIGHT_CLOCK_PERIOD_MS: u64 = 1000;

    /// Simulated descent time for `land` while the motors run
    pub const LAND_DELAY_MS: u64 = 1000;

    /// Wifi reconfiguration latency imposed after replying to `wifi`
    pub const WIFI_RECONFIGURE_DELAY_MS: u64 = 6000;

    /// Reported by `sn?`
    pub const SERIAL_NUMBER: &str = "0TQDG7REDBD9ZC";

    /// Reported by `sdk?`
    pub const SDK_VERSION: &str = "20";

    /// Verb that opens a control channel
    pub const HANDSHAKE_VERB: &str = "command";

    /// Verb that reconfigures wifi and reboots the drone
    pub const WIFI_VERB: &str = "wifi";

    /// Distance argument range for movement commands (cm)
    pub const MOVE_RANGE: (i32, i32) = (20, 500);

    /// Angle argument range for rotation commands (degrees)
    pub const ROTATE_RANGE: (i32, i32) = (1, 3600);

    /// Speed argument range (cm/s)
    pub const SPEED_RANGE: (i32, i32) = (10, 100);

    /// Stick value range for `rc`
    pub const RC_RANGE: (i32, i32) = (-100, 100);

    /// Number of stick channels carried by `rc`
    pub const RC_CHANNELS: usize = 4;

    /// Height ceiling after `up` (cm)
    pub const MAX_HEIGHT_CM: i32 = 500;

    /// Height floor after `down` (cm)
    pub const MIN_HOVER_HEIGHT_CM: i32 = 10;
}

/// Result of interpreting one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Command accepted
    Ok,
    /// Query reply carrying a formatted value
    Value(String),
    /// Numeric argument outside its allowed domain
    OutOfRange,
    /// Movement attempted while the motors are off
    MotorsOff,
    /// Generic failure (empty line, bad flip direction)
    Error,
    /// Unknown verb or wrong arity for a known verb
    Unknown(String),
    /// Valid command that is never acknowledged
    NoResponse,
}

impl CommandOutcome {
    /// The reply text, or `None` when nothing goes back on the wire
    pub fn wire_text(&self) -> Option<String> {
        match self {
            CommandOutcome::Ok => Some("ok".into()),
            CommandOutcome::Value(text) => Some(text.clone()),
            CommandOutcome::OutOfRange => Some("out of range".into()),
            CommandOutcome::MotorsOff => Some("error Motor stop".into()),
            CommandOutcome::Error => Some("error".into()),
            CommandOutcome::Unknown(verb) => Some(format!("unknown command: {}", verb)),
            CommandOutcome::NoResponse => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandOutcome::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_text() {
        assert_eq!(CommandOutcome::Ok.wire_text().as_deref(), Some("ok"));
        assert_eq!(
            CommandOutcome::OutOfRange.wire_text().as_deref(),
            Some("out of range")
        );
        assert_eq!(
            CommandOutcome::MotorsOff.wire_text().as_deref(),
            Some("error Motor stop")
        );
        assert_eq!(
            CommandOutcome::Unknown("foo".into()).wire_text().as_deref(),
            Some("unknown command: foo")
        );
        assert_eq!(CommandOutcome::NoResponse.wire_text(), None);
    }

    #[test]
    fn test_value_passthrough() {
        let outcome = CommandOutcome::Value("5dm".into());
        assert_eq!(outcome.wire_text().as_deref(), Some("5dm"));
        assert!(!outcome.is_ok());
    }
}
