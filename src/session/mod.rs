//! Control-channel session tracking
//!
//! This module handles:
//! - Registering peers that complete the `command` handshake
//! - Refreshing their last-seen time on every later handshake
//! - Expiring peers that went silent

mod registry;

pub use registry::SessionRegistry;
