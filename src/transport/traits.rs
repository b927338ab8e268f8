//! Transport trait abstraction for datagram backends

use anyhow::Result;
use async_trait::async_trait;
use std::net::SocketAddr;

/// A connectionless transport carrying one message per datagram
#[async_trait]
pub trait DatagramTransport: Send + Sync + 'static {
    /// Wait for the next datagram, returning its length and sender
    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)>;

    /// Send one datagram to `target`
    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize>;

    /// Address this transport is bound to
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
