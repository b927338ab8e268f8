//! Session registry for tracking every peer with an open control channel

use std::collections::BTreeMap;
use std::net::SocketAddr;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// One active control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEntry {
    pub endpoint: SocketAddr,
    pub last_seen: Instant,
}

impl SessionEntry {
    /// Check if the peer has been silent for longer than `timeout`
    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > timeout
    }
}

/// Tracks control channels by remote endpoint.
///
/// Every access goes through one exclusive lock; the command worker, the
/// telemetry broadcaster and the console all share the registry.
pub struct SessionRegistry {
    sessions: Mutex<BTreeMap<SocketAddr, Instant>>,
    timeout: Duration,
}

impl SessionRegistry {
    /// Create an empty registry expiring sessions after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(BTreeMap::new()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Record a handshake from `endpoint`; returns true for a new channel
    pub async fn touch(&self, endpoint: SocketAddr) -> bool {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(endpoint, Instant::now()).is_none()
    }

    /// All sessions, ordered by endpoint
    pub async fn snapshot(&self) -> Vec<SessionEntry> {
        let sessions = self.sessions.lock().await;
        sessions
            .iter()
            .map(|(endpoint, last_seen)| SessionEntry {
                endpoint: *endpoint,
                last_seen: *last_seen,
            })
            .collect()
    }

    /// Remove sessions silent for longer than the timeout and return them
    pub async fn expire(&self, now: Instant) -> Vec<SocketAddr> {
        let mut sessions = self.sessions.lock().await;
        let timeout = self.timeout;

        let dead: Vec<SocketAddr> = sessions
            .iter()
            .filter(|(_, last_seen)| now.saturating_duration_since(**last_seen) > timeout)
            .map(|(endpoint, _)| *endpoint)
            .collect();

        for endpoint in &dead {
            sessions.remove(endpoint);
        }
        dead
    }

    /// Remove the given sessions, returning how many were present
    pub async fn remove(&self, endpoints: &[SocketAddr]) -> usize {
        let mut sessions = self.sessions.lock().await;
        endpoints
            .iter()
            .filter(|endpoint| sessions.remove(endpoint).is_some())
            .count()
    }

    /// Drop every session
    pub async fn clear(&self) {
        self.sessions.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_touch_reports_new_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        assert!(registry.touch(addr(5000)).await);
        assert!(!registry.touch(addr(5000)).await);
        assert!(registry.touch(addr(5001)).await);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_refreshes_last_seen() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.touch(addr(5000)).await;
        let first = registry.snapshot().await[0].last_seen;

        tokio::time::advance(Duration::from_secs(5)).await;
        registry.touch(addr(5000)).await;

        let refreshed = registry.snapshot().await[0].last_seen;
        assert_eq!(refreshed.duration_since(first), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_snapshot_is_ordered() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.touch(addr(7000)).await;
        registry.touch(addr(6000)).await;
        registry.touch(addr(6500)).await;

        let endpoints: Vec<_> = registry.snapshot().await.iter().map(|e| e.endpoint).collect();
        assert_eq!(endpoints, vec![addr(6000), addr(6500), addr(7000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_removes_silent_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.touch(addr(5000)).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        registry.touch(addr(5001)).await;

        // exactly at the timeout the first session is still alive
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(registry.expire(Instant::now()).await.is_empty());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(registry.expire(Instant::now()).await, vec![addr(5000)]);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        registry.touch(addr(5000)).await;
        registry.touch(addr(5001)).await;

        assert_eq!(registry.remove(&[addr(5000), addr(9999)]).await, 1);
        assert_eq!(registry.len().await, 1);

        registry.clear().await;
        assert!(registry.is_empty().await);
    }

    #[test]
    fn test_entry_expiry() {
        let now = Instant::now();
        let entry = SessionEntry {
            endpoint: addr(5000),
            last_seen: now,
        };
        assert!(!entry.is_expired(now + Duration::from_secs(60), Duration::from_secs(60)));
        assert!(entry.is_expired(now + Duration::from_millis(60_001), Duration::from_secs(60)));
    }
}
