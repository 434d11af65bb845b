/// Connect tokens: hand a validated descriptor from `/connect` to `/ws`
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::ssh::ConnectionDescriptor;

struct PendingEntry {
    descriptor: ConnectionDescriptor,
    expires_at: Instant,
}

/// Short-lived, single-use map from token to descriptor
#[derive(Clone)]
pub struct PendingConnections {
    entries: Arc<Mutex<HashMap<String, PendingEntry>>>,
    ttl: Duration,
}

impl PendingConnections {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a descriptor and return the token that redeems it
    pub async fn insert(&self, descriptor: ConnectionDescriptor) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Instant::now();

        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        if entries.len() < before {
            debug!(purged = before - entries.len(), "Purged expired connect tokens");
        }
        entries.insert(
            token.clone(),
            PendingEntry {
                descriptor,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Redeem a token. Works at most once, and only before it expires.
    pub async fn take(&self, token: &str) -> Option<ConnectionDescriptor> {
        let entry = self.entries.lock().await.remove(token)?;
        if entry.expires_at <= Instant::now() {
            debug!("Connect token expired");
            return None;
        }
        Some(entry.descriptor)
    }

    /// Number of tokens not yet redeemed, including expired ones not purged yet
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(host: &str) -> ConnectionDescriptor {
        ConnectionDescriptor::new(host, "", "alice", "pw").unwrap()
    }

    #[tokio::test]
    async fn token_redeems_once() {
        let pending = PendingConnections::new(Duration::from_secs(60));
        let token = pending.insert(descriptor("a.example")).await;

        assert_eq!(pending.take(&token).await.map(|d| d.host().to_string()), Some("a.example".into()));
        assert!(pending.take(&token).await.is_none());
        assert!(pending.is_empty().await);
    }

    #[tokio::test]
    async fn tokens_are_independent_per_client() {
        let pending = PendingConnections::new(Duration::from_secs(60));
        let first = pending.insert(descriptor("a.example")).await;
        let second = pending.insert(descriptor("b.example")).await;
        assert_ne!(first, second);

        assert_eq!(pending.take(&second).await.unwrap().host(), "b.example");
        assert_eq!(pending.take(&first).await.unwrap().host(), "a.example");
    }

    #[tokio::test]
    async fn unknown_token_yields_nothing() {
        let pending = PendingConnections::new(Duration::from_secs(60));
        assert!(pending.take("not-a-token").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_token_is_refused_and_purged() {
        let pending = PendingConnections::new(Duration::from_secs(5));
        let stale = pending.insert(descriptor("a.example")).await;

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(pending.take(&stale).await.is_none());

        let old = pending.insert(descriptor("a.example")).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        let _fresh = pending.insert(descriptor("b.example")).await;
        assert_eq!(pending.len().await, 1);
        assert!(pending.take(&old).await.is_none());
    }
}
