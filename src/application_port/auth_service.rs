use crate::domain_model::Identity;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("malformed token")]
    MalformedToken,
    #[error("token invalid")]
    InvalidToken,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Mint a fresh token pair for a verified identity and persist the
    /// session, replacing any prior session for the same subject.
    async fn issue_session(&self, identity: Identity) -> Result<AuthTokens, AuthError>;

    /// Validate an access token and return the identity carried in its
    /// claims. Expired, forged and revoked tokens are rejected.
    async fn verify_token(&self, access_token: &str) -> Result<Identity, AuthError>;

    /// Exchange a still-valid refresh token for a new access token,
    /// retiring the access token it replaces.
    async fn reissue(&self, refresh_token: &str) -> Result<AccessToken, AuthError>;

    /// Revoke the subject's current token pair and drop the session.
    /// A subject with no session is a no-op.
    async fn logout(&self, subject: &str) -> Result<(), AuthError>;
}
