use crate::config::MailConfig;
use crate::entities::mail_settings_entity as mail_settings;
use crate::error::{AppError, AppResult};
use crate::external::MailerService;
use crate::models::{MailSettingsRequest, MailSettingsResponse};
use crate::services::ActivityLogService;
use crate::utils::{require_text, validate_email};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

/// The settings table holds a single row with this id.
const SETTINGS_ID: i64 = 1;

#[derive(Clone)]
pub struct MailSettingsService {
    pool: DatabaseConnection,
    mailer: MailerService,
    activity: ActivityLogService,
}

impl MailSettingsService {
    pub fn new(pool: DatabaseConnection, mailer: MailerService, activity: ActivityLogService) -> Self {
        Self {
            pool,
            mailer,
            activity,
        }
    }

    /// Creates the settings row from configuration on first start. An
    /// existing row is left alone so dashboard edits survive restarts.
    pub async fn seed_from_config(&self, cfg: &MailConfig) -> AppResult<()> {
        if mail_settings::Entity::find_by_id(SETTINGS_ID)
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Ok(());
        }

        mail_settings::ActiveModel {
            id: Set(SETTINGS_ID),
            api_base_url: Set(cfg.api_base_url.clone()),
            api_key: Set(cfg.api_key.clone()),
            from_address: Set(cfg.from_address.clone()),
            from_name: Set(cfg.from_name.clone()),
            updated_at: Set(Utc::now()),
        }
        .insert(&self.pool)
        .await?;
        log::info!("Mail settings initialised from configuration");
        Ok(())
    }

    pub async fn get(&self) -> AppResult<MailSettingsResponse> {
        Ok(self.load().await?.into())
    }

    pub async fn update(
        &self,
        actor: i64,
        req: MailSettingsRequest,
    ) -> AppResult<MailSettingsResponse> {
        let api_base_url = require_text("api_base_url", &req.api_base_url, 500)?;
        if !(api_base_url.starts_with("https://") || api_base_url.starts_with("http://")) {
            return Err(AppError::ValidationError(
                "api_base_url must be an http(s) URL".into(),
            ));
        }
        let from_address = require_text("from_address", &req.from_address, 255)?;
        validate_email(&from_address)?;
        let from_name = req.from_name.trim().to_string();

        let mut am = self.load().await?.into_active_model();
        am.api_base_url = Set(api_base_url);
        am.from_address = Set(from_address);
        am.from_name = Set(from_name);
        if let Some(key) = req.api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            am.api_key = Set(key);
        }
        am.updated_at = Set(Utc::now());
        let saved = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "settings.mail_updated",
                "mail_settings",
                SETTINGS_ID,
                "Updated mail settings",
            )
            .await;
        Ok(saved.into())
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> AppResult<()> {
        let settings = self.load().await?;
        self.mailer.send(&settings, to, subject, text).await
    }

    /// Sends a test message. Delivery failures are logged and answered with a
    /// generic error.
    pub async fn send_test(&self, actor: i64, to: &str) -> AppResult<()> {
        validate_email(to)?;
        let result = self
            .send(
                to,
                "EventHub test message",
                "Mail delivery from the EventHub dashboard is working.",
            )
            .await;

        match result {
            Ok(()) => {
                self.activity
                    .record(
                        actor,
                        "settings.mail_tested",
                        "mail_settings",
                        SETTINGS_ID,
                        format!("Sent a test mail to {to}"),
                    )
                    .await;
                Ok(())
            }
            Err(e) => {
                log::error!("Test mail to {} failed: {}", to, e);
                Err(AppError::ExternalApiError(
                    "The test mail could not be sent, check the mail settings".into(),
                ))
            }
        }
    }

    async fn load(&self) -> AppResult<mail_settings::Model> {
        mail_settings::Entity::find_by_id(SETTINGS_ID)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ConfigError("Mail settings are not initialised".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;

    async fn service() -> MailSettingsService {
        let pool = setup_db().await;
        let svc = MailSettingsService::new(
            pool.clone(),
            MailerService::new(),
            ActivityLogService::new(pool),
        );
        svc.seed_from_config(&MailConfig {
            api_base_url: "https://mail.example.test/v1".into(),
            api_key: "sk-live-1234567890wxyz".into(),
            from_address: "no-reply@eventhub.io".into(),
            from_name: "EventHub".into(),
        })
        .await
        .unwrap();
        svc
    }

    #[tokio::test]
    async fn test_key_is_masked_and_kept_when_omitted() {
        let svc = service().await;
        assert_eq!(svc.get().await.unwrap().api_key, "****wxyz");

        let updated = svc
            .update(
                1,
                MailSettingsRequest {
                    api_base_url: "https://mail2.example.test".into(),
                    api_key: None,
                    from_address: "events@eventhub.io".into(),
                    from_name: "Events".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.api_key, "****wxyz");
        assert_eq!(updated.from_address, "events@eventhub.io");

        // seeding again leaves the edited row alone
        svc.seed_from_config(&MailConfig::default()).await.unwrap();
        assert_eq!(svc.get().await.unwrap().api_base_url, "https://mail2.example.test");
    }

    #[tokio::test]
    async fn test_update_validation() {
        let svc = service().await;
        let bad_url = MailSettingsRequest {
            api_base_url: "ftp://mail".into(),
            api_key: None,
            from_address: "events@eventhub.io".into(),
            from_name: String::new(),
        };
        assert!(matches!(
            svc.update(1, bad_url).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            svc.send_test(1, "nobody").await,
            Err(AppError::ValidationError(_))
        ));
    }
}
