use crate::application_port::*;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Record `token` as revoked until `expires_at`, which is the token's
    /// own expiry claim. A token already past its expiry is not stored;
    /// it no longer validates anyway.
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError>;

    /// Pure existence check. The caller decides whether presence is an
    /// error.
    async fn contains(&self, token: &str) -> Result<bool, AuthError>;
}
