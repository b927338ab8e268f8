//! Command handlers for the different verb families

mod flight;
mod movement;
mod query;
mod settings;

pub use flight::{handle_emergency, handle_land, handle_takeoff};
pub use movement::{handle_move, handle_rotate};
pub use query::handle_query;
pub use settings::{handle_flip, handle_rc, handle_speed, handle_wifi};

use crate::clock::FlightClock;
use crate::protocol::SharedFlightState;
use std::sync::Arc;
use std::time::Duration;

/// Context passed to command handlers
#[derive(Clone)]
pub struct HandlerContext {
    pub state: SharedFlightState,
    pub clock: Arc<FlightClock>,
    /// Descent time for `land` while the motors run
    pub land_delay: Duration,
}
