//! Flight State Model
//!
//! Everything the drone reports over telemetry or query replies lives in a
//! single [`FlightState`]. Protocol rules (clamping, wrap-around, motors
//! checks) are applied by the command handlers; this module only keeps the
//! invariants that every writer must respect.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default barometer reading reported after boot
pub const DEFAULT_BAROMETER: f32 = 0.795338;

/// Default battery level at power-on
pub const DEFAULT_BATTERY_PCT: i32 = 67;

/// Default speed setting (cm/s)
pub const DEFAULT_SPEED: i32 = 100;

/// Default roll reading at rest
pub const DEFAULT_ROLL: i32 = 2;

/// Default board temperatures (°C)
pub const DEFAULT_TEMP_LOW_C: i32 = 58;
pub const DEFAULT_TEMP_HIGH_C: i32 = 62;

/// Resting accelerometer reading (0.001g)
pub const DEFAULT_ACCELERATION: Vector3 = Vector3::new(-1.0, 5.0, -1001.0);

/// Three-component float vector (position, velocity, acceleration, mpry)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Errors from range-checked field writes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("'{field}' must be an integer between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i32,
        max: i32,
    },
}

/// Complete drone state as observed through the wire protocol
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    pub motors_engaged: bool,
    /// Height above takeoff point in cm; reported in dm
    pub height_cm: i32,
    pub speed: i32,
    pub battery_pct: i32,

    pub pitch: i32,
    pub roll: i32,
    pub yaw: i32,

    /// Time-of-flight register, shared by all lateral movement commands
    pub tof: i32,
    pub flight_time_sec: i32,

    /// Mission pad id, -1 when no pad is detected
    pub mission_pad_id: i32,
    pub mission_pad_pose: Vector3,

    pub barometer: f32,
    pub position: Vector3,
    pub velocity: Vector3,
    pub acceleration: Vector3,

    pub temp_low_c: i32,
    pub temp_high_c: i32,
    pub wifi_snr: i32,
}

impl Default for FlightState {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightState {
    /// Create a freshly booted drone on the ground
    pub fn new() -> Self {
        Self {
            motors_engaged: false,
            height_cm: 0,
            speed: DEFAULT_SPEED,
            battery_pct: DEFAULT_BATTERY_PCT,
            pitch: 0,
            roll: DEFAULT_ROLL,
            yaw: 0,
            tof: 0,
            flight_time_sec: 0,
            mission_pad_id: -1,
            mission_pad_pose: Vector3::ZERO,
            barometer: DEFAULT_BAROMETER,
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            acceleration: DEFAULT_ACCELERATION,
            temp_low_c: DEFAULT_TEMP_LOW_C,
            temp_high_c: DEFAULT_TEMP_HIGH_C,
            wifi_snr: 0,
        }
    }

    /// Reboot: land and restore every flight field.
    ///
    /// Battery level and board temperatures are operator-controlled and
    /// survive a reboot.
    pub fn reset(&mut self) {
        self.land();
        self.mission_pad_id = -1;
        self.speed = DEFAULT_SPEED;
        self.yaw = 0;
        self.pitch = 0;
        self.roll = DEFAULT_ROLL;
        self.tof = 0;
        self.flight_time_sec = 0;
        self.barometer = DEFAULT_BAROMETER;
        self.wifi_snr = 0;
        self.acceleration = DEFAULT_ACCELERATION;
        self.velocity = Vector3::ZERO;
        self.position = Vector3::ZERO;
        self.mission_pad_pose = Vector3::ZERO;
    }

    /// Start the motors and lift off to the minimal hover height
    pub fn take_off(&mut self) {
        self.motors_engaged = true;
        self.height_cm = 1;
    }

    /// Stop the motors and sit on the ground
    pub fn land(&mut self) {
        self.height_cm = 0;
        self.motors_engaged = false;
    }

    /// Height as shown on the wire (decimeters, truncated)
    pub fn height_dm(&self) -> i32 {
        self.height_cm / 10
    }

    /// Turn by `degrees` (positive is clockwise) and re-normalize yaw
    pub fn rotate(&mut self, degrees: i32) {
        self.yaw = normalize_angle(self.yaw + degrees);
    }

    /// Current value of an operator-visible field
    pub fn field(&self, field: Field) -> i32 {
        match field {
            Field::Battery => self.battery_pct,
            Field::Height => self.height_cm,
            Field::Yaw => self.yaw,
            Field::Pitch => self.pitch,
            Field::Roll => self.roll,
            Field::WifiSnr => self.wifi_snr,
            Field::TempLow => self.temp_low_c,
            Field::TempHigh => self.temp_high_c,
        }
    }

    /// Range-checked write of an operator-visible field
    pub fn set_field(&mut self, field: Field, value: i32) -> Result<(), FieldError> {
        let (min, max) = field.range(self);
        if value < min || value > max {
            return Err(FieldError::OutOfRange {
                field: field.name(),
                min,
                max,
            });
        }

        let slot = match field {
            Field::Battery => &mut self.battery_pct,
            Field::Height => &mut self.height_cm,
            Field::Yaw => &mut self.yaw,
            Field::Pitch => &mut self.pitch,
            Field::Roll => &mut self.roll,
            Field::WifiSnr => &mut self.wifi_snr,
            Field::TempLow => &mut self.temp_low_c,
            Field::TempHigh => &mut self.temp_high_c,
        };
        *slot = value;
        Ok(())
    }
}

/// Wrap an angle into [-180, 179]
pub fn normalize_angle(degrees: i32) -> i32 {
    (degrees + 180).rem_euclid(360) - 180
}

/// Fields an operator may inspect or override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Battery,
    Height,
    Yaw,
    Pitch,
    Roll,
    WifiSnr,
    TempLow,
    TempHigh,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Battery,
        Field::Height,
        Field::Yaw,
        Field::Pitch,
        Field::Roll,
        Field::WifiSnr,
        Field::TempLow,
        Field::TempHigh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Battery => "battery",
            Field::Height => "height",
            Field::Yaw => "yaw",
            Field::Pitch => "pitch",
            Field::Roll => "roll",
            Field::WifiSnr => "wifi",
            Field::TempLow => "templ",
            Field::TempHigh => "temph",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::Battery => "%",
            Field::Height => "cm",
            Field::Yaw | Field::Pitch | Field::Roll => "°",
            Field::WifiSnr => "dBm",
            Field::TempLow | Field::TempHigh => "°C",
        }
    }

    /// Inclusive range; the temperature bounds depend on each other
    pub fn range(&self, state: &FlightState) -> (i32, i32) {
        match self {
            Field::Battery => (0, 100),
            Field::Height => (0, 500),
            Field::Yaw => (-180, 179),
            Field::Pitch | Field::Roll => (-90, 90),
            Field::WifiSnr => (-99, 0),
            Field::TempLow => (10, state.temp_high_c),
            Field::TempHigh => (state.temp_low_c, 100),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == lower)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = FlightState::new();
        assert!(!state.motors_engaged);
        assert_eq!(state.height_cm, 0);
        assert_eq!(state.battery_pct, 67);
        assert_eq!(state.speed, 100);
        assert_eq!(state.roll, 2);
        assert_eq!(state.mission_pad_id, -1);
        assert_eq!(state.acceleration, Vector3::new(-1.0, 5.0, -1001.0));
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0), 0);
        assert_eq!(normalize_angle(179), 179);
        assert_eq!(normalize_angle(180), -180);
        assert_eq!(normalize_angle(-180), -180);
        assert_eq!(normalize_angle(-181), 179);
        assert_eq!(normalize_angle(3600), 0);
        assert_eq!(normalize_angle(-3600 - 90), -90);
    }

    #[test]
    fn test_rotate_stays_in_range() {
        let mut state = FlightState::new();
        for step in [1, 90, 359, 360, 1000, 3600, -1, -270, -3600] {
            state.rotate(step);
            assert!((-180..=179).contains(&state.yaw), "yaw {}", state.yaw);
        }
    }

    #[test]
    fn test_reset_keeps_operator_fields() {
        let mut state = FlightState::new();
        state.take_off();
        state.battery_pct = 12;
        state.temp_high_c = 80;
        state.yaw = 45;
        state.tof = 300;
        state.flight_time_sec = 17;
        state.speed = 30;

        state.reset();

        assert!(!state.motors_engaged);
        assert_eq!(state.height_cm, 0);
        assert_eq!(state.yaw, 0);
        assert_eq!(state.tof, 0);
        assert_eq!(state.flight_time_sec, 0);
        assert_eq!(state.speed, 100);
        assert_eq!(state.battery_pct, 12);
        assert_eq!(state.temp_high_c, 80);
    }

    #[test]
    fn test_set_field_range_checked() {
        let mut state = FlightState::new();
        assert!(state.set_field(Field::Battery, 100).is_ok());
        assert_eq!(state.battery_pct, 100);

        let err = state.set_field(Field::Battery, 101).unwrap_err();
        assert_eq!(
            err,
            FieldError::OutOfRange {
                field: "battery",
                min: 0,
                max: 100
            }
        );
        assert_eq!(state.battery_pct, 100);
    }

    #[test]
    fn test_temperature_bounds_follow_each_other() {
        let mut state = FlightState::new();
        // templ may not exceed temph
        assert!(state.set_field(Field::TempLow, 63).is_err());
        assert!(state.set_field(Field::TempLow, 62).is_ok());
        // temph may not drop below templ
        assert!(state.set_field(Field::TempHigh, 61).is_err());
        assert!(state.set_field(Field::TempHigh, 70).is_ok());
        assert!(state.temp_low_c <= state.temp_high_c);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("WIFI".parse::<Field>(), Ok(Field::WifiSnr));
        assert_eq!("templ".parse::<Field>(), Ok(Field::TempLow));
        assert!(matches!(
            "altitude".parse::<Field>(),
            Err(FieldError::UnknownField(_))
        ));
    }
}
