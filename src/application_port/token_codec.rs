use crate::application_port::{AccessToken, AuthError, RefreshToken};
use crate::domain_model::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed token payload: subject, role, issue and expiry instants in
/// unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        // An out-of-range exp behaves as long expired.
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.role.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub claims: TokenClaims,
    pub expired: bool,
}

#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    async fn issue_access_token(
        &self,
        identity: &Identity,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError>;

    async fn issue_refresh_token(
        &self,
        identity: &Identity,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError>;

    /// Verify the signature and decode the claims. An expired token still
    /// decodes; `expired` reports the fact instead of suppressing the
    /// claims, because the refresh flow needs the subject out of an
    /// expired token.
    async fn parse(&self, token: &str) -> Result<ParsedToken, AuthError>;

    /// `Ok(false)` for empty or expired input. Decode failures are errors
    /// in their own right, not `false`.
    async fn is_valid(&self, token: &str) -> Result<bool, AuthError>;
}
