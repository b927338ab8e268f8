//! In-memory transport for tests

use crate::transport::traits::DatagramTransport;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;
use tokio::sync::{mpsc, Mutex};

/// Datagram transport backed by channels.
///
/// Inbound datagrams (or receive errors) are injected through the sender
/// returned by `new`; outbound datagrams are recorded and can be inspected
/// with `sent`.
pub struct MockTransport {
    local: SocketAddr,
    inbound: Mutex<mpsc::UnboundedReceiver<io::Result<(Vec<u8>, SocketAddr)>>>,
    sent: Mutex<Vec<(SocketAddr, Bytes)>>,
    unreachable: Mutex<HashSet<SocketAddr>>,
}

pub type Inbound = mpsc::UnboundedSender<io::Result<(Vec<u8>, SocketAddr)>>;

impl MockTransport {
    pub fn new() -> (Self, Inbound) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            local: "127.0.0.1:8889".parse().expect("valid address"),
            inbound: Mutex::new(rx),
            sent: Mutex::new(Vec::new()),
            unreachable: Mutex::new(HashSet::new()),
        };
        (transport, tx)
    }

    /// Make every later send to `addr` fail
    pub async fn set_unreachable(&self, addr: SocketAddr) {
        self.unreachable.lock().await.insert(addr);
    }

    /// All datagrams sent so far, in order
    pub async fn sent(&self) -> Vec<(SocketAddr, String)> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(addr, bytes)| (*addr, String::from_utf8_lossy(bytes).into_owned()))
            .collect()
    }

    /// Datagrams sent to `addr`, in order
    pub async fn sent_to(&self, addr: SocketAddr) -> Vec<String> {
        self.sent()
            .await
            .into_iter()
            .filter(|(target, _)| *target == addr)
            .map(|(_, text)| text)
            .collect()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl DatagramTransport for MockTransport {
    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        let (payload, from) = self
            .inbound
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| anyhow!("transport closed"))??;
        let n = payload.len().min(buf.len());
        buf[..n].copy_from_slice(&payload[..n]);
        Ok((n, from))
    }

    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize> {
        if self.unreachable.lock().await.contains(&target) {
            return Err(anyhow!("host unreachable: {}", target));
        }
        self.sent
            .lock()
            .await
            .push((target, Bytes::copy_from_slice(payload)));
        Ok(payload.len())
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.local)
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
