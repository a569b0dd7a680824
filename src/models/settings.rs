//! Mail configuration, backups and the assistant.

use crate::entities::mail_settings_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MailSettingsRequest {
    #[schema(example = "https://api.mailer.example/v1")]
    pub api_base_url: String,
    /// Left unchanged when omitted or empty
    pub api_key: Option<String>,
    #[schema(example = "no-reply@eventhub.io")]
    pub from_address: String,
    #[schema(example = "EventHub")]
    pub from_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MailSettingsResponse {
    pub api_base_url: String,
    /// Masked, e.g. `****abcd`
    pub api_key: String,
    pub from_address: String,
    pub from_name: String,
    pub updated_at: DateTime<Utc>,
}

impl From<mail_settings_entity::Model> for MailSettingsResponse {
    fn from(m: mail_settings_entity::Model) -> Self {
        Self {
            api_key: mask_secret(&m.api_key),
            api_base_url: m.api_base_url,
            from_address: m.from_address,
            from_name: m.from_name,
            updated_at: m.updated_at,
        }
    }
}

/// Keeps the last four characters of secrets longer than eight.
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len == 0 {
        return String::new();
    }
    if len <= 8 {
        return "*".repeat(len);
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("****{tail}")
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestMailRequest {
    #[schema(example = "ops@eventhub.io")]
    pub to: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackupFile {
    pub name: String,
    pub size_bytes: u64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssistantRequest {
    #[schema(example = "Draft a welcome note for RustConf attendees")]
    pub prompt: String,
    /// Extra text placed before the prompt, such as the event description
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssistantResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("key-1234567890abcd"), "****abcd");
    }
}
