//! Command interpretation for the emulated drone
//!
//! This module handles:
//! - Splitting a datagram into verb and arguments
//! - Arity, argument and motors validation, in protocol order
//! - Dispatching to the flight, movement, query and settings handlers
//! - Mapping every result to a wire outcome

mod executor;
pub mod handlers;
mod parser;
mod verb;

pub use executor::CommandExecutor;
pub use parser::CommandLine;
