use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Upsert the session for `record.subject`, unconditionally
    /// overwriting any existing record and resetting the store TTL.
    async fn save(&self, record: &SessionRecord) -> Result<(), AuthError>;

    async fn find_by_subject(&self, subject: &str) -> Result<Option<SessionRecord>, AuthError>;

    /// Secondary lookup for callers that only hold the access token.
    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionRecord>, AuthError>;

    async fn delete_by_subject(&self, subject: &str) -> Result<(), AuthError>;
}
