//! Speed, flip, remote-control sticks and wifi reconfiguration

use super::HandlerContext;
use crate::command::parser::{parse_bounded, ArgError};
use crate::protocol::{protocol, CommandOutcome};
use tracing::{debug, info};

/// Handle `speed <n>`
pub async fn handle_speed(ctx: &HandlerContext, arg: &str) -> CommandOutcome {
    match parse_bounded(arg, protocol::SPEED_RANGE) {
        Ok(speed) => {
            ctx.state.lock().await.speed = speed;
            CommandOutcome::Ok
        }
        Err(e) => e.into_outcome("speed"),
    }
}

/// Handle `flip <dir>`; the drone does not move
pub fn handle_flip(direction: &str) -> CommandOutcome {
    match direction {
        "l" | "r" | "f" | "b" => CommandOutcome::Ok,
        _ => CommandOutcome::Error,
    }
}

/// Handle `rc <roll> <pitch> <throttle> <yaw> [...]`.
///
/// At least the four stick channels are validated, plus any extra values
/// given; a missing channel counts as malformed. Sticks are streamed
/// continuously and never acknowledged.
pub fn handle_rc(args: &[String]) -> CommandOutcome {
    let positions = args.len().max(protocol::RC_CHANNELS);

    for index in 0..positions {
        let checked = args
            .get(index)
            .ok_or(ArgError::Malformed)
            .and_then(|arg| parse_bounded(arg, protocol::RC_RANGE));
        if let Err(e) = checked {
            return e.into_outcome("rc");
        }
    }

    debug!("[RC] sticks {:?}", args);
    CommandOutcome::NoResponse
}

/// Handle `wifi <ssid> <password>`: the drone reboots with the new settings
pub async fn handle_wifi(ctx: &HandlerContext, ssid: &str) -> CommandOutcome {
    let mut state = ctx.state.lock().await;
    state.reset();
    ctx.clock.stop().await;

    info!("[WIFI] Reconfigured for SSID '{}', state reset", ssid);
    CommandOutcome::Ok
}
