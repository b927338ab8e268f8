//! Command executor - validates and dispatches incoming command lines

use super::handlers::{self, HandlerContext};
use super::parser::CommandLine;
use super::verb::Verb;
use crate::clock::FlightClock;
use crate::protocol::{CommandOutcome, SharedFlightState};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Interprets command lines against the shared flight state
pub struct CommandExecutor {
    ctx: HandlerContext,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new(state: SharedFlightState, clock: Arc<FlightClock>, land_delay: Duration) -> Self {
        Self {
            ctx: HandlerContext {
                state,
                clock,
                land_delay,
            },
        }
    }

    pub fn state(&self) -> &SharedFlightState {
        &self.ctx.state
    }

    pub fn clock(&self) -> &Arc<FlightClock> {
        &self.ctx.clock
    }

    /// Parse and execute one raw command line
    #[cfg(test)]
    pub async fn execute_line(&self, line: &str) -> CommandOutcome {
        match CommandLine::parse(line) {
            Some(command) => self.execute(&command).await,
            None => CommandOutcome::Error,
        }
    }

    /// Execute a parsed command.
    ///
    /// Validation order: arity, then argument parsing and range, then the
    /// motors check, then the state change.
    pub async fn execute(&self, command: &CommandLine) -> CommandOutcome {
        let name = command.verb.as_str();
        let args = command.args.as_slice();

        let verb = match Verb::parse(name) {
            Some(verb) if verb.arity().accepts(args.len()) => verb,
            _ => return CommandOutcome::Unknown(command.verb.clone()),
        };

        let ctx = &self.ctx;
        let outcome = match verb {
            Verb::Handshake | Verb::NoOp => CommandOutcome::Ok,
            Verb::Takeoff => handlers::handle_takeoff(ctx).await,
            Verb::Land => handlers::handle_land(ctx).await,
            Verb::Emergency => handlers::handle_emergency(ctx).await,
            Verb::Query(query) => handlers::handle_query(ctx, query).await,
            Verb::Move(direction) => handlers::handle_move(ctx, name, direction, &args[0]).await,
            Verb::Rotate(rotation) => handlers::handle_rotate(ctx, name, rotation, &args[0]).await,
            Verb::Speed => handlers::handle_speed(ctx, &args[0]).await,
            Verb::Flip => handlers::handle_flip(&args[0]),
            Verb::Rc => handlers::handle_rc(args),
            Verb::Wifi => handlers::handle_wifi(ctx, &args[0]).await,
        };

        debug!("Executed {:?} {:?} -> {:?}", verb, args, outcome);
        outcome
    }
}
