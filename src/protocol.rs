pub use tello_shared::{codec, protocol, CommandOutcome, Field, FieldError, FlightState};

use std::sync::Arc;
use tokio::sync::Mutex;

/// The single flight state shared by the command worker, the periodic tasks
/// and the console
pub type SharedFlightState = Arc<Mutex<FlightState>>;

pub fn shared_state(state: FlightState) -> SharedFlightState {
    Arc::new(Mutex::new(state))
}
