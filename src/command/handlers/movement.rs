//! Movement and rotation commands

use super::HandlerContext;
use crate::command::parser::parse_bounded;
use crate::command::verb::{MoveDirection, Rotation};
use crate::protocol::{protocol, CommandOutcome};

/// Handle `up`, `down`, `left`, `right`, `forward` and `backward`.
///
/// Vertical moves act on the height and clamp it; the four lateral moves
/// all accumulate into the single time-of-flight register, which wraps
/// instead of overflowing.
pub async fn handle_move(
    ctx: &HandlerContext,
    verb: &str,
    direction: MoveDirection,
    arg: &str,
) -> CommandOutcome {
    let distance = match parse_bounded(arg, protocol::MOVE_RANGE) {
        Ok(distance) => distance,
        Err(e) => return e.into_outcome(verb),
    };

    let mut state = ctx.state.lock().await;
    if !state.motors_engaged {
        return CommandOutcome::MotorsOff;
    }

    match direction {
        MoveDirection::Up => {
            state.height_cm = (state.height_cm + distance).min(protocol::MAX_HEIGHT_CM);
        }
        MoveDirection::Down => {
            state.height_cm = (state.height_cm - distance).max(protocol::MIN_HOVER_HEIGHT_CM);
        }
        MoveDirection::Right | MoveDirection::Forward => {
            state.tof = state.tof.wrapping_add(distance);
        }
        MoveDirection::Left | MoveDirection::Backward => {
            state.tof = state.tof.wrapping_sub(distance);
        }
    }

    CommandOutcome::Ok
}

/// Handle `cw` and `ccw`
pub async fn handle_rotate(
    ctx: &HandlerContext,
    verb: &str,
    rotation: Rotation,
    arg: &str,
) -> CommandOutcome {
    let degrees = match parse_bounded(arg, protocol::ROTATE_RANGE) {
        Ok(degrees) => degrees,
        Err(e) => return e.into_outcome(verb),
    };

    let mut state = ctx.state.lock().await;
    if !state.motors_engaged {
        return CommandOutcome::MotorsOff;
    }

    match rotation {
        Rotation::Clockwise => state.rotate(degrees),
        Rotation::CounterClockwise => state.rotate(-degrees),
    }

    CommandOutcome::Ok
}
