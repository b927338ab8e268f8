//! Takeoff, landing and emergency stop

use super::HandlerContext;
use crate::protocol::CommandOutcome;
use tracing::{info, warn};

/// Handle `takeoff`
pub async fn handle_takeoff(ctx: &HandlerContext) -> CommandOutcome {
    let mut state = ctx.state.lock().await;
    state.take_off();
    let generation = ctx.clock.start().await;

    info!("[FLIGHT] Takeoff (flight {})", generation);
    CommandOutcome::Ok
}

/// Handle `land`
///
/// While the motors run this holds the command worker for the descent time,
/// so no other command is serviced until the drone is down.
pub async fn handle_land(ctx: &HandlerContext) -> CommandOutcome {
    let flying = ctx.state.lock().await.motors_engaged;
    if flying {
        info!("[FLIGHT] Landing, descent takes {}ms", ctx.land_delay.as_millis());
        tokio::time::sleep(ctx.land_delay).await;
    }

    ground(ctx).await;
    info!("[FLIGHT] Landed");
    CommandOutcome::Ok
}

/// Handle `emergency`: motors off at once, never acknowledged
pub async fn handle_emergency(ctx: &HandlerContext) -> CommandOutcome {
    ground(ctx).await;
    warn!("[FLIGHT] EMERGENCY STOP - motors killed");
    CommandOutcome::NoResponse
}

async fn ground(ctx: &HandlerContext) {
    let mut state = ctx.state.lock().await;
    state.land();
    ctx.clock.stop().await;
}
