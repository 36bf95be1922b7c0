use serde::{Deserialize, Serialize};

/// The single live token pair for one subject. Saving a record for a
/// subject replaces whatever was there before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub subject: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl SessionRecord {
    pub fn new(
        subject: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        SessionRecord {
            subject: subject.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}
