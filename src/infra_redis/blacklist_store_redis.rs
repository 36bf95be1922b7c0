use crate::application_port::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Revoked tokens live under `{prefix}:{token}` with a TTL equal to the
/// token's remaining lifetime, millisecond precision. Redis expiry is
/// what bounds the revocation; there is no explicit delete.
pub struct RedisBlacklistStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisBlacklistStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisBlacklistStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, token: &str) -> String {
        format!("{}:{}", self.prefix, token)
    }
}

#[async_trait::async_trait]
impl BlacklistStore for RedisBlacklistStore {
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let remaining_ms = (expires_at - Utc::now()).num_milliseconds();
        // Nothing to guard once the token no longer validates on its own.
        if remaining_ms <= 0 {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let _: () = conn
            .pset_ex(self.key(token), "true", remaining_ms as u64)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, AuthError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn
            .exists(self.key(token))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(exists)
    }
}
