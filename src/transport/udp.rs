//! UDP transport, the production backend for the command port

use crate::transport::traits::DatagramTransport;
use anyhow::Result;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::UdpSocket;

/// Failures while opening the command socket
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("another process is already bound to UDP port {}", .addr.port())]
    AddressInUse { addr: SocketAddr },

    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// UDP socket wrapper implementing DatagramTransport
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind the command socket
    pub async fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        match UdpSocket::bind(addr).await {
            Ok(socket) => Ok(Self { socket }),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                Err(TransportError::AddressInUse { addr })
            }
            Err(source) => Err(TransportError::Bind { addr, source }),
        }
    }
}

#[async_trait]
impl DatagramTransport for UdpTransport {
    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        Ok(self.socket.recv_from(buf).await?)
    }

    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize> {
        Ok(self.socket.send_to(payload, target).await?)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    fn name(&self) -> &'static str {
        "UDP"
    }
}
