use crate::entities::mail_settings_entity;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: MailAddress<'a>,
    to: Vec<MailAddress<'a>>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct MailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// HTTP mail API client. Endpoint and credentials are read from the
/// stored mail settings on every send so dashboard changes apply at once.
#[derive(Clone)]
pub struct MailerService {
    client: Client,
}

impl Default for MailerService {
    fn default() -> Self {
        Self::new()
    }
}

impl MailerService {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("eventhub-backend/mailer")
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    pub async fn send(
        &self,
        settings: &mail_settings_entity::Model,
        to: &str,
        subject: &str,
        text: &str,
    ) -> AppResult<()> {
        if settings.api_base_url.is_empty() || settings.from_address.is_empty() {
            return Err(AppError::ConfigError("Mail delivery is not configured".into()));
        }

        let url = format!("{}/send", settings.api_base_url.trim_end_matches('/'));
        let body = SendMailRequest {
            from: MailAddress {
                email: &settings.from_address,
                name: Some(settings.from_name.as_str()).filter(|n| !n.is_empty()),
            },
            to: vec![MailAddress {
                email: to,
                name: None,
            }],
            subject,
            text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&settings.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Mail sent to {}: {}", to, subject);
            Ok(())
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Mail to {} failed: HTTP {}: {}", to, status.as_u16(), error_text);
            Err(AppError::ExternalApiError(format!(
                "Mail API returned HTTP {}",
                status.as_u16()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_unconfigured_settings_fail_without_network() {
        let settings = mail_settings_entity::Model {
            id: 1,
            api_base_url: String::new(),
            api_key: String::new(),
            from_address: String::new(),
            from_name: String::new(),
            updated_at: Utc::now(),
        };
        let err = MailerService::new()
            .send(&settings, "ops@eventhub.io", "Hi", "Body")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_request_shape() {
        let body = SendMailRequest {
            from: MailAddress {
                email: "no-reply@eventhub.io",
                name: Some("EventHub"),
            },
            to: vec![MailAddress {
                email: "a@b.co",
                name: None,
            }],
            subject: "Code",
            text: "123456",
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["from"]["name"], "EventHub");
        assert!(v["to"][0].get("name").is_none());
    }
}
