//! Read-only `<field>?` queries

use super::HandlerContext;
use crate::command::verb::Query;
use crate::protocol::{codec, protocol, CommandOutcome};

/// Handle every `<field>?` query
pub async fn handle_query(ctx: &HandlerContext, query: Query) -> CommandOutcome {
    let state = ctx.state.lock().await;

    let value = match query {
        Query::Battery => state.battery_pct.to_string(),
        Query::Wifi => state.wifi_snr.to_string(),
        Query::Speed => format!("{}.0", state.speed),
        Query::SerialNumber => protocol::SERIAL_NUMBER.to_string(),
        Query::Height => format!("{}dm", state.height_dm()),
        Query::Temperature => format!("{}~{}C", state.temp_low_c, state.temp_high_c),
        Query::Barometer => format!("{:.6}", state.barometer),
        Query::Tof => format!("{}mm", state.tof.wrapping_mul(10)),
        Query::Time => format!("{}s", state.flight_time_sec),
        Query::Attitude => codec::attitude_text(&state),
        Query::Acceleration => codec::acceleration_text(&state),
        Query::Sdk => protocol::SDK_VERSION.to_string(),
    };

    CommandOutcome::Value(value)
}
