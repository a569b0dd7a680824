use crate::config::AdminConfig;
use crate::entities::{
    SocialProvider, password_reset_entity as resets, social_account_entity as socials,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    LinkSocialAccountRequest, LoginRequest, LoginResponse, PasswordResetRequest,
    SocialAccountResponse, SocialLoginRequest, UserResponse,
};
use crate::services::{ActivityLogService, MailSettingsService};
use crate::utils::{
    JwtService, generate_six_digit_code, hash_password, validate_email, validate_password,
    verify_password,
};
use chrono::{Duration, Utc};
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Reset codes expire after this many minutes.
pub const RESET_CODE_TTL_MINUTES: i64 = 10;
/// Wrong guesses allowed per reset code.
pub const MAX_RESET_ATTEMPTS: i32 = 5;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    mail: MailSettingsService,
    activity: ActivityLogService,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        mail: MailSettingsService,
        activity: ActivityLogService,
    ) -> Self {
        Self {
            pool,
            jwt_service,
            mail,
            activity,
        }
    }

    /// Creates the configured administrator when there are no users yet.
    pub async fn ensure_admin(&self, cfg: &AdminConfig) -> AppResult<()> {
        if users::Entity::find().count(&self.pool).await? > 0 {
            return Ok(());
        }
        if cfg.email.is_empty() || cfg.password.is_empty() {
            log::warn!("No users exist and no admin is configured; nobody can log in");
            return Ok(());
        }

        let email = normalize_email(&cfg.email);
        validate_email(&email)?;
        validate_password(&cfg.password)?;
        let name = if cfg.name.trim().is_empty() {
            "Administrator".to_string()
        } else {
            cfg.name.trim().to_string()
        };

        let now = Utc::now();
        let admin = users::ActiveModel {
            name: Set(name),
            email: Set(email),
            password_hash: Set(hash_password(&cfg.password)?),
            is_admin: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Created initial administrator {}", admin.email);
        Ok(())
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let email = normalize_email(&request.email);
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?;

        let user = match user {
            Some(u) if verify_password(&request.password, &u.password_hash)? => u,
            _ => {
                log::warn!("Failed login for {}", email);
                return Err(AppError::AuthError("Invalid email or password".into()));
            }
        };

        self.activity
            .record(user.id, "auth.login", "user", user.id, format!("{} logged in", user.email))
            .await;
        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<LoginResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".into()))?;
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".into()))?;
        self.issue_tokens(user)
    }

    pub async fn me(&self, user_id: i64) -> AppResult<UserResponse> {
        Ok(self.find_user(user_id).await?.into())
    }

    /// Starts an OTP password reset. Unknown addresses get the same answer as
    /// known ones, and mail failures are only logged.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        if validate_email(&email).is_err() {
            return Ok(());
        }
        let Some(user) = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
        else {
            log::info!("Password reset requested for unknown address");
            return Ok(());
        };

        let now = Utc::now();
        let code = generate_six_digit_code();
        let txn = self.pool.begin().await?;
        resets::Entity::update_many()
            .col_expr(resets::Column::UsedAt, Expr::value(now))
            .filter(resets::Column::Email.eq(email.as_str()))
            .filter(resets::Column::UsedAt.is_null())
            .exec(&txn)
            .await?;
        resets::ActiveModel {
            email: Set(email.clone()),
            code: Set(code.clone()),
            expires_at: Set(now + Duration::minutes(RESET_CODE_TTL_MINUTES)),
            attempts: Set(0),
            used_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        let body = format!(
            "Your EventHub password reset code is {code}. It expires in {RESET_CODE_TTL_MINUTES} minutes."
        );
        if let Err(e) = self
            .mail
            .send(&user.email, "Your password reset code", &body)
            .await
        {
            log::error!("Could not deliver reset code to user {}: {}", user.id, e);
        }
        Ok(())
    }

    /// Completes a reset with the newest outstanding code for the address.
    pub async fn reset_password(&self, request: PasswordResetRequest) -> AppResult<()> {
        validate_password(&request.new_password)?;
        let email = normalize_email(&request.email);
        let now = Utc::now();
        let invalid = || AppError::ValidationError("Invalid or expired code".into());

        let reset = resets::Entity::find()
            .filter(resets::Column::Email.eq(email.as_str()))
            .filter(resets::Column::UsedAt.is_null())
            .order_by_desc(resets::Column::CreatedAt)
            .order_by_desc(resets::Column::Id)
            .one(&self.pool)
            .await?
            .filter(|r| r.is_usable(now, MAX_RESET_ATTEMPTS))
            .ok_or_else(invalid)?;

        // Take an attempt before comparing so parallel guesses cannot share one.
        let slot = resets::Entity::update_many()
            .col_expr(
                resets::Column::Attempts,
                Expr::col(resets::Column::Attempts).add(1),
            )
            .filter(resets::Column::Id.eq(reset.id))
            .filter(resets::Column::Attempts.lt(MAX_RESET_ATTEMPTS))
            .filter(resets::Column::UsedAt.is_null())
            .exec(&self.pool)
            .await?;
        if slot.rows_affected == 0 || reset.code != request.code.trim() {
            return Err(invalid());
        }

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(invalid)?;

        let txn = self.pool.begin().await?;
        let claimed = resets::Entity::update_many()
            .col_expr(resets::Column::UsedAt, Expr::value(now))
            .filter(resets::Column::Id.eq(reset.id))
            .filter(resets::Column::UsedAt.is_null())
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            return Err(invalid());
        }
        let user_id = user.id;
        let mut am = user.into_active_model();
        am.password_hash = Set(hash_password(&request.new_password)?);
        am.updated_at = Set(now);
        am.update(&txn).await?;
        txn.commit().await?;

        self.activity
            .record(user_id, "auth.password_reset", "user", user_id, "Password reset with a one-time code")
            .await;
        Ok(())
    }

    /// Deletes reset codes that are used or expired.
    pub async fn purge_stale_reset_codes(&self) -> AppResult<u64> {
        let res = resets::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(resets::Column::UsedAt.is_not_null())
                    .add(resets::Column::ExpiresAt.lte(Utc::now())),
            )
            .exec(&self.pool)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn list_social_accounts(&self, user_id: i64) -> AppResult<Vec<SocialAccountResponse>> {
        let rows = socials::Entity::find()
            .filter(socials::Column::UserId.eq(user_id))
            .order_by_asc(socials::Column::Provider)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn link_social_account(
        &self,
        user_id: i64,
        request: LinkSocialAccountRequest,
    ) -> AppResult<SocialAccountResponse> {
        let provider_user_id = request.provider_user_id.trim().to_string();
        if provider_user_id.is_empty() {
            return Err(AppError::ValidationError(
                "provider_user_id is required".into(),
            ));
        }
        self.find_user(user_id).await?;

        if let Some(existing) = socials::Entity::find()
            .filter(socials::Column::Provider.eq(request.provider))
            .filter(socials::Column::ProviderUserId.eq(provider_user_id.as_str()))
            .one(&self.pool)
            .await?
        {
            if existing.user_id == user_id {
                return Ok(existing.into());
            }
            return Err(AppError::BusinessRule(format!(
                "This {} account is linked to another user",
                request.provider
            )));
        }

        let already = socials::Entity::find()
            .filter(socials::Column::UserId.eq(user_id))
            .filter(socials::Column::Provider.eq(request.provider))
            .count(&self.pool)
            .await?;
        if already > 0 {
            return Err(AppError::BusinessRule(format!(
                "A {} account is already linked, unlink it first",
                request.provider
            )));
        }

        let account = socials::ActiveModel {
            user_id: Set(user_id),
            provider: Set(request.provider),
            provider_user_id: Set(provider_user_id),
            email: Set(request.email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                user_id,
                "auth.social_linked",
                "user",
                user_id,
                format!("Linked {} account", account.provider),
            )
            .await;
        Ok(account.into())
    }

    pub async fn unlink_social_account(&self, user_id: i64, provider: SocialProvider) -> AppResult<()> {
        let account = socials::Entity::find()
            .filter(socials::Column::UserId.eq(user_id))
            .filter(socials::Column::Provider.eq(provider))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {provider} account is linked")))?;
        account.delete(&self.pool).await?;

        self.activity
            .record(
                user_id,
                "auth.social_unlinked",
                "user",
                user_id,
                format!("Unlinked {provider} account"),
            )
            .await;
        Ok(())
    }

    /// Logs in through an already linked provider account.
    pub async fn social_login(&self, request: SocialLoginRequest) -> AppResult<LoginResponse> {
        let account = socials::Entity::find()
            .filter(socials::Column::Provider.eq(request.provider))
            .filter(socials::Column::ProviderUserId.eq(request.provider_user_id.trim()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::AuthError(format!("No user is linked to this {} account", request.provider))
            })?;
        let user = self.find_user(account.user_id).await?;

        self.activity
            .record(
                user.id,
                "auth.login",
                "user",
                user.id,
                format!("{} logged in with {}", user.email, account.provider),
            )
            .await;
        self.issue_tokens(user)
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<LoginResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id, &user.email)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, &user.email)?;
        Ok(LoginResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: user.into(),
        })
    }

    async fn find_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailConfig;
    use crate::database::test_support::{seed_user, setup_db};
    use crate::external::MailerService;

    async fn service() -> (AuthService, DatabaseConnection) {
        let pool = setup_db().await;
        let activity = ActivityLogService::new(pool.clone());
        let mail = MailSettingsService::new(pool.clone(), MailerService::new(), activity.clone());
        // unconfigured mail: sends fail fast without touching the network
        mail.seed_from_config(&MailConfig::default()).await.unwrap();
        let jwt = JwtService::new("test-secret", 3600, 86400);
        (AuthService::new(pool.clone(), jwt, mail, activity), pool)
    }

    async fn latest_code(pool: &DatabaseConnection, email: &str) -> resets::Model {
        resets::Entity::find()
            .filter(resets::Column::Email.eq(email))
            .order_by_desc(resets::Column::Id)
            .one(pool)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_admin_and_login() {
        let (svc, _) = service().await;
        svc.ensure_admin(&AdminConfig {
            name: "Ops".into(),
            email: "Ops@EventHub.io".into(),
            password: "Secret123".into(),
        })
        .await
        .unwrap();

        let res = svc
            .login(LoginRequest {
                email: "ops@eventhub.io".into(),
                password: "Secret123".into(),
            })
            .await
            .unwrap();
        assert!(res.user.is_admin);

        let refreshed = svc.refresh_token(&res.refresh_token).await.unwrap();
        assert_eq!(refreshed.user.id, res.user.id);
        assert!(svc.refresh_token(&res.access_token).await.is_err());

        assert!(matches!(
            svc.login(LoginRequest {
                email: "ops@eventhub.io".into(),
                password: "wrong".into(),
            })
            .await,
            Err(AppError::AuthError(_))
        ));
    }

    #[tokio::test]
    async fn test_otp_reset_flow() {
        let (svc, pool) = service().await;
        let user_id = seed_user(&pool, "Kim", "kim@eventhub.io").await;

        // unknown addresses are answered the same way
        svc.request_password_reset("ghost@eventhub.io").await.unwrap();
        svc.request_password_reset("kim@eventhub.io").await.unwrap();
        let first = latest_code(&pool, "kim@eventhub.io").await;
        svc.request_password_reset("kim@eventhub.io").await.unwrap();
        let second = latest_code(&pool, "kim@eventhub.io").await;
        assert_ne!(first.id, second.id);

        // the earlier code was invalidated
        let stale = svc
            .reset_password(PasswordResetRequest {
                email: "kim@eventhub.io".into(),
                code: first.code.clone(),
                new_password: "NewPass123".into(),
            })
            .await;
        if first.code != second.code {
            assert!(stale.is_err());
        }

        svc.reset_password(PasswordResetRequest {
            email: "kim@eventhub.io".into(),
            code: second.code.clone(),
            new_password: "NewPass123".into(),
        })
        .await
        .unwrap();

        let login = svc
            .login(LoginRequest {
                email: "kim@eventhub.io".into(),
                password: "NewPass123".into(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, user_id);

        // a used code cannot be replayed
        assert!(svc
            .reset_password(PasswordResetRequest {
                email: "kim@eventhub.io".into(),
                code: second.code,
                new_password: "Another123".into(),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_otp_attempt_limit() {
        let (svc, pool) = service().await;
        seed_user(&pool, "Lee", "lee@eventhub.io").await;
        svc.request_password_reset("lee@eventhub.io").await.unwrap();
        let code = latest_code(&pool, "lee@eventhub.io").await.code;
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for _ in 0..MAX_RESET_ATTEMPTS {
            assert!(svc
                .reset_password(PasswordResetRequest {
                    email: "lee@eventhub.io".into(),
                    code: wrong.into(),
                    new_password: "NewPass123".into(),
                })
                .await
                .is_err());
        }

        // locked even with the right code
        assert!(svc
            .reset_password(PasswordResetRequest {
                email: "lee@eventhub.io".into(),
                code,
                new_password: "NewPass123".into(),
            })
            .await
            .is_err());
        assert_eq!(
            latest_code(&pool, "lee@eventhub.io").await.attempts,
            MAX_RESET_ATTEMPTS
        );
    }

    #[tokio::test]
    async fn test_parallel_guesses_share_the_attempt_budget() {
        let (svc, pool) = service().await;
        seed_user(&pool, "Ava", "ava@eventhub.io").await;
        svc.request_password_reset("ava@eventhub.io").await.unwrap();
        let reset = latest_code(&pool, "ava@eventhub.io").await;
        let wrong = if reset.code == "000000" { "111111" } else { "000000" };

        // one guess left
        resets::Entity::update_many()
            .col_expr(resets::Column::Attempts, Expr::value(MAX_RESET_ATTEMPTS - 1))
            .filter(resets::Column::Id.eq(reset.id))
            .exec(&pool)
            .await
            .unwrap();

        let guesses = (0..8).map(|_| {
            svc.reset_password(PasswordResetRequest {
                email: "ava@eventhub.io".into(),
                code: wrong.into(),
                new_password: "NewPass123".into(),
            })
        });
        let results = futures_util::future::join_all(guesses).await;
        assert!(results.iter().all(|r| r.is_err()));
        assert_eq!(
            latest_code(&pool, "ava@eventhub.io").await.attempts,
            MAX_RESET_ATTEMPTS
        );

        assert!(svc
            .reset_password(PasswordResetRequest {
                email: "ava@eventhub.io".into(),
                code: reset.code,
                new_password: "NewPass123".into(),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_purge_stale_reset_codes() {
        let (svc, pool) = service().await;
        seed_user(&pool, "Max", "max@eventhub.io").await;
        svc.request_password_reset("max@eventhub.io").await.unwrap();
        svc.request_password_reset("max@eventhub.io").await.unwrap();

        // the first code was invalidated by the second request
        assert_eq!(svc.purge_stale_reset_codes().await.unwrap(), 1);
        assert_eq!(resets::Entity::find().count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_social_linking() {
        let (svc, pool) = service().await;
        let a = seed_user(&pool, "A", "a@eventhub.io").await;
        let b = seed_user(&pool, "B", "b@eventhub.io").await;

        let link = LinkSocialAccountRequest {
            provider: SocialProvider::Github,
            provider_user_id: "gh-42".into(),
            email: None,
        };
        svc.link_social_account(a, link).await.unwrap();

        assert!(matches!(
            svc.link_social_account(
                b,
                LinkSocialAccountRequest {
                    provider: SocialProvider::Github,
                    provider_user_id: "gh-42".into(),
                    email: None,
                },
            )
            .await,
            Err(AppError::BusinessRule(_))
        ));

        let res = svc
            .social_login(SocialLoginRequest {
                provider: SocialProvider::Github,
                provider_user_id: "gh-42".into(),
            })
            .await
            .unwrap();
        assert_eq!(res.user.id, a);
        assert_eq!(svc.list_social_accounts(a).await.unwrap().len(), 1);

        svc.unlink_social_account(a, SocialProvider::Github).await.unwrap();
        assert!(matches!(
            svc.social_login(SocialLoginRequest {
                provider: SocialProvider::Github,
                provider_user_id: "gh-42".into(),
            })
            .await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            svc.unlink_social_account(a, SocialProvider::Github).await,
            Err(AppError::NotFound(_))
        ));
    }
}
