use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealAuthService {
    token_codec: Arc<dyn TokenCodec>,
    session_store: Arc<dyn SessionStore>,
    blacklist_store: Arc<dyn BlacklistStore>,
}

impl RealAuthService {
    pub fn new(
        token_codec: Arc<dyn TokenCodec>,
        session_store: Arc<dyn SessionStore>,
        blacklist_store: Arc<dyn BlacklistStore>,
    ) -> Self {
        Self {
            token_codec,
            session_store,
            blacklist_store,
        }
    }

    /// Blacklist `token` for the remainder of its own lifetime, unless it
    /// is already listed.
    async fn retire_token(&self, token: &str) -> Result<(), AuthError> {
        if self.blacklist_store.contains(token).await? {
            return Ok(());
        }
        let parsed = self.token_codec.parse(token).await?;
        self.blacklist_store
            .add(token, parsed.claims.expires_at())
            .await
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn issue_session(&self, identity: Identity) -> Result<AuthTokens, AuthError> {
        let (access_token, access_exp) = self.token_codec.issue_access_token(&identity).await?;
        let (refresh_token, refresh_exp) = self.token_codec.issue_refresh_token(&identity).await?;

        self.session_store
            .save(&SessionRecord::new(
                &identity.subject,
                &access_token.0,
                &refresh_token.0,
            ))
            .await?;
        debug!(subject = %identity.subject, "session issued");

        Ok(AuthTokens {
            access_token,
            refresh_token,
            access_token_expires_at: access_exp,
            refresh_token_expires_at: refresh_exp,
        })
    }

    async fn verify_token(&self, access_token: &str) -> Result<Identity, AuthError> {
        if !self.token_codec.is_valid(access_token).await? {
            return Err(AuthError::TokenExpired);
        }
        if self.blacklist_store.contains(access_token).await? {
            return Err(AuthError::InvalidToken);
        }
        let parsed = self.token_codec.parse(access_token).await?;
        Ok(parsed.claims.identity())
    }

    async fn reissue(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        let parsed = self.token_codec.parse(refresh_token).await?;
        if parsed.expired {
            return Err(AuthError::TokenExpired);
        }
        if self.blacklist_store.contains(refresh_token).await? {
            return Err(AuthError::InvalidToken);
        }

        let identity = parsed.claims.identity();
        let session = self.session_store.find_by_subject(&identity.subject).await?;

        // Retire the outgoing access token before minting its
        // replacement, so a rotated-out token can never replay.
        if let Some(session) = &session {
            self.retire_token(&session.access_token).await?;
        }

        let (access_token, _) = self.token_codec.issue_access_token(&identity).await?;

        match session {
            Some(session) => {
                self.session_store
                    .save(&SessionRecord::new(
                        &identity.subject,
                        &access_token.0,
                        &session.refresh_token,
                    ))
                    .await?;
                debug!(subject = %identity.subject, "access token rotated");
            }
            // A missing session record does not block the reissue; the
            // refresh token itself is the credential here.
            None => {
                warn!(subject = %identity.subject, "reissue without a session record");
            }
        }

        Ok(access_token)
    }

    async fn logout(&self, subject: &str) -> Result<(), AuthError> {
        let Some(session) = self.session_store.find_by_subject(subject).await? else {
            return Ok(());
        };

        self.retire_token(&session.access_token).await?;
        self.retire_token(&session.refresh_token).await?;
        self.session_store.delete_by_subject(subject).await?;
        info!(subject, "logged out");

        Ok(())
    }
}
