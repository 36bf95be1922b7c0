use serde::{Deserialize, Serialize};

/// A principal verified by the upstream login collaborator.
///
/// `subject` is the durable user identifier; `role` drives authorization
/// downstream. `provider_attributes` carries whatever profile payload the
/// OAuth2 provider returned with the identity; it never enters a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_attributes: Option<serde_json::Value>,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Identity {
            subject: subject.into(),
            role: role.into(),
            provider_attributes: None,
        }
    }

    pub fn with_provider_attributes(mut self, attributes: serde_json::Value) -> Self {
        self.provider_attributes = Some(attributes);
        self
    }
}
