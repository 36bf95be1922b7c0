use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::time::Duration;

/// Single-process stand-in for the shared redis store. Entries expire
/// lazily: a dead record is dropped by the read that finds it.
pub struct MemorySessionStore {
    ttl: Duration,
    records: DashMap<String, (SessionRecord, DateTime<Utc>)>,
    subject_by_access: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        MemorySessionStore {
            ttl,
            records: DashMap::new(),
            subject_by_access: DashMap::new(),
        }
    }

    fn live_record(&self, subject: &str) -> Option<SessionRecord> {
        let dead = match self.records.get(subject) {
            Some(entry) => {
                let (record, expires_at) = entry.value();
                if *expires_at > Utc::now() {
                    return Some(record.clone());
                }
                true
            }
            None => false,
        };
        if dead {
            self.records.remove(subject);
        }
        None
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, record: &SessionRecord) -> Result<(), AuthError> {
        let expires_at = Utc::now() + self.ttl;
        self.subject_by_access
            .insert(record.access_token.clone(), record.subject.clone());
        self.records
            .insert(record.subject.clone(), (record.clone(), expires_at));
        Ok(())
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.live_record(subject))
    }

    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionRecord>, AuthError> {
        let Some(subject) = self
            .subject_by_access
            .get(access_token)
            .map(|s| s.value().clone())
        else {
            return Ok(None);
        };
        // The index is advisory; the record is authoritative.
        Ok(self
            .live_record(&subject)
            .filter(|record| record.access_token == access_token))
    }

    async fn delete_by_subject(&self, subject: &str) -> Result<(), AuthError> {
        self.records.remove(subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

    fn record(access: &str) -> SessionRecord {
        SessionRecord::new("42", access, "refresh-1")
    }

    #[tokio::test]
    async fn save_then_find_by_subject() {
        let store = MemorySessionStore::new(TTL);
        store.save(&record("access-1")).await.unwrap();

        let found = store.find_by_subject("42").await.unwrap().unwrap();
        assert_eq!(found, record("access-1"));
        assert!(store.find_by_subject("43").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_record() {
        let store = MemorySessionStore::new(TTL);
        store.save(&record("access-1")).await.unwrap();
        store.save(&record("access-2")).await.unwrap();

        let found = store.find_by_subject("42").await.unwrap().unwrap();
        assert_eq!(found.access_token, "access-2");
    }

    #[tokio::test]
    async fn find_by_access_token_tracks_the_current_record() {
        let store = MemorySessionStore::new(TTL);
        store.save(&record("access-1")).await.unwrap();
        store.save(&record("access-2")).await.unwrap();

        let found = store.find_by_access_token("access-2").await.unwrap().unwrap();
        assert_eq!(found.access_token, "access-2");
        // The stale index entry for the replaced token resolves to None.
        assert!(store.find_by_access_token("access-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemorySessionStore::new(TTL);
        store.save(&record("access-1")).await.unwrap();
        store.delete_by_subject("42").await.unwrap();

        assert!(store.find_by_subject("42").await.unwrap().is_none());
        assert!(store.find_by_access_token("access-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn records_expire_with_the_store_ttl() {
        let store = MemorySessionStore::new(Duration::ZERO);
        store.save(&record("access-1")).await.unwrap();

        assert!(store.find_by_subject("42").await.unwrap().is_none());
        assert!(store.find_by_access_token("access-1").await.unwrap().is_none());
    }
}
