use crate::application_port::*;
use crate::domain_model::Identity;
use chrono::{Duration, Utc};

#[derive(Debug)]
pub struct FakeAuthService;

impl FakeAuthService {
    pub fn new() -> Self {
        Self
    }
}

// Minimal fake implementation for collaborator development only.
// Tokens are transparent strings; nothing is signed or persisted.
#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn issue_session(&self, identity: Identity) -> Result<AuthTokens, AuthError> {
        Ok(fake_tokens(&identity.subject, &identity.role))
    }

    async fn verify_token(&self, access_token: &str) -> Result<Identity, AuthError> {
        parse_fake(access_token, "fake-access-token:")
    }

    async fn reissue(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        let identity = parse_fake(refresh_token, "fake-refresh-token:")?;
        Ok(fake_tokens(&identity.subject, &identity.role).access_token)
    }

    async fn logout(&self, _subject: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

fn parse_fake(token: &str, prefix: &str) -> Result<Identity, AuthError> {
    let rest = token.strip_prefix(prefix).ok_or(AuthError::InvalidToken)?;
    let (subject, role) = rest.split_once(':').ok_or(AuthError::InvalidToken)?;
    Ok(Identity::new(subject, role))
}

fn fake_tokens(subject: &str, role: &str) -> AuthTokens {
    let now = Utc::now();
    AuthTokens {
        access_token: AccessToken(format!("fake-access-token:{}:{}", subject, role)),
        refresh_token: RefreshToken(format!("fake-refresh-token:{}:{}", subject, role)),
        access_token_expires_at: now + Duration::minutes(3),
        refresh_token_expires_at: now + Duration::days(3),
    }
}
