//! Text codec for the Tello wire protocol
//!
//! Replies and telemetry are bare ASCII datagrams with no framing:
//! ```text
//! mid:-1;x:0;y:0;z:0;mpry:0,0,0;pitch:0;roll:2;yaw:0;...;agz:-1001.00;
//! ```
//! Every field is `name:value;` and the field order is fixed.

use bytes::Bytes;

use crate::{CommandOutcome, FlightState};

/// Format with no decimals, rounding half away from zero
pub fn format_f0(value: f32) -> String {
    format!("{:.0}", value.round())
}

/// Format with exactly two decimals
pub fn format_f2(value: f32) -> String {
    format!("{:.2}", value)
}

/// Format a barometer reading: rounded to six decimals, trailing zeros
/// trimmed but never fewer than two decimals
pub fn format_baro(value: f32) -> String {
    let mut text = format!("{:.6}", value);
    if let Some(dot) = text.find('.') {
        let min_len = dot + 3;
        while text.len() > min_len && text.ends_with('0') {
            text.pop();
        }
    }
    text
}

/// `attitude?` reply
pub fn attitude_text(state: &FlightState) -> String {
    format!(
        "pitch:{};roll:{};yaw:{};",
        state.pitch, state.roll, state.yaw
    )
}

/// `acceleration?` reply, also the tail of the telemetry line
pub fn acceleration_text(state: &FlightState) -> String {
    format!(
        "agx:{};agy:{};agz:{};",
        format_f2(state.acceleration.x),
        format_f2(state.acceleration.y),
        format_f2(state.acceleration.z)
    )
}

/// Serialize the full telemetry line
pub fn telemetry_line(state: &FlightState) -> String {
    let pad = &state.mission_pad_pose;
    let pos = &state.position;
    let vel = &state.velocity;

    format!(
        "mid:{};x:{};y:{};z:{};mpry:{},{},{};{}vgx:{};vgy:{};vgz:{};templ:{};temph:{};tof:{};h:{};bat:{};baro:{};time:{};{}",
        state.mission_pad_id,
        format_f0(pos.x),
        format_f0(pos.y),
        format_f0(pos.z),
        format_f0(pad.x),
        format_f0(pad.y),
        format_f0(pad.z),
        attitude_text(state),
        format_f0(vel.x),
        format_f0(vel.y),
        format_f0(vel.z),
        state.temp_low_c,
        state.temp_high_c,
        state.tof,
        state.height_dm(),
        state.battery_pct,
        format_baro(state.barometer),
        state.flight_time_sec,
        acceleration_text(state),
    )
}

/// Encode the telemetry datagram
pub fn encode_telemetry(state: &FlightState) -> Bytes {
    Bytes::from(telemetry_line(state))
}

/// Encode a command reply; `None` means nothing is sent
pub fn encode_response(outcome: &CommandOutcome) -> Option<Bytes> {
    outcome.wire_text().map(Bytes::from)
}
