pub mod traits;
pub mod udp;

#[cfg(test)]
pub mod mock;

pub use traits::DatagramTransport;
pub use udp::{TransportError, UdpTransport};
