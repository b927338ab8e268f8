//! UDP command server
//!
//! This module handles:
//! - Receiving one command per datagram on a single worker
//! - Replying (or staying silent) per the command outcome
//! - Opening control channels on the `command` handshake
//! - The reboot pause after `wifi`

mod command_server;

pub use command_server::CommandServer;
