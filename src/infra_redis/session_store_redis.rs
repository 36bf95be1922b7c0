use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Session records live under `{prefix}:subject:{subject}` as JSON, with
/// a secondary index `{prefix}:access:{token} -> subject` so a session
/// can be found from the access token alone. Both keys carry the session
/// TTL; redis expiry is the only eviction.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, ttl_secs: u64) -> Self {
        RedisSessionStore {
            conn,
            prefix: prefix.into(),
            ttl_secs,
        }
    }

    fn subject_key(&self, subject: &str) -> String {
        format!("{}:subject:{}", self.prefix, subject)
    }

    fn access_key(&self, access_token: &str) -> String {
        format!("{}:access:{}", self.prefix, access_token)
    }

    async fn load(&self, subject: &str) -> Result<Option<SessionRecord>, AuthError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.subject_key(subject))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        raw.map(|json| serde_json::from_str(&json).map_err(|e| AuthError::Store(e.to_string())))
            .transpose()
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, record: &SessionRecord) -> Result<(), AuthError> {
        let json = serde_json::to_string(record).map_err(|e| AuthError::Store(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(self.subject_key(&record.subject), json, self.ttl_secs)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let _: () = conn
            .set_ex(
                self.access_key(&record.access_token),
                &record.subject,
                self.ttl_secs,
            )
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<SessionRecord>, AuthError> {
        self.load(subject).await
    }

    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionRecord>, AuthError> {
        let mut conn = self.conn.clone();
        let subject: Option<String> = conn
            .get(self.access_key(access_token))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        let Some(subject) = subject else {
            return Ok(None);
        };
        // An index key can outlive the record it pointed at; the record
        // decides.
        Ok(self
            .load(&subject)
            .await?
            .filter(|record| record.access_token == access_token))
    }

    async fn delete_by_subject(&self, subject: &str) -> Result<(), AuthError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(self.subject_key(subject))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }
}
