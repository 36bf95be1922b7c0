use crate::application_port::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Single-process stand-in for the shared redis blacklist. Entries die
/// exactly at the revoked token's own expiry; dead entries are dropped
/// by the read that finds them.
pub struct MemoryBlacklistStore {
    entries: DashMap<String, DateTime<Utc>>,
}

impl MemoryBlacklistStore {
    pub fn new() -> Self {
        MemoryBlacklistStore {
            entries: DashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl BlacklistStore for MemoryBlacklistStore {
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        // Nothing to guard once the token no longer validates on its own.
        if expires_at <= Utc::now() {
            return Ok(());
        }
        self.entries.insert(token.to_string(), expires_at);
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, AuthError> {
        let live = match self.entries.get(token) {
            Some(entry) => *entry.value() > Utc::now(),
            None => return Ok(false),
        };
        if !live {
            self.entries.remove(token);
        }
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as TimeDelta;

    #[tokio::test]
    async fn added_token_is_contained() {
        let store = MemoryBlacklistStore::new();
        store
            .add("token-1", Utc::now() + TimeDelta::minutes(3))
            .await
            .unwrap();

        assert!(store.contains("token-1").await.unwrap());
        assert!(!store.contains("token-2").await.unwrap());
    }

    #[tokio::test]
    async fn already_expired_token_is_not_stored() {
        let store = MemoryBlacklistStore::new();
        store
            .add("token-1", Utc::now() - TimeDelta::seconds(1))
            .await
            .unwrap();

        assert!(store.is_empty());
        assert!(!store.contains("token-1").await.unwrap());
    }

    #[tokio::test]
    async fn revocation_does_not_outlive_the_token() {
        let store = MemoryBlacklistStore::new();
        // Bypass add() to plant an entry whose lifetime has elapsed.
        store
            .entries
            .insert("token-1".to_string(), Utc::now() - TimeDelta::seconds(1));

        assert!(!store.contains("token-1").await.unwrap());
        assert!(store.is_empty());
    }
}
