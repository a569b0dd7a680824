use crate::entities::{SocialProvider, social_account_entity, user_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@eventhub.io")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            is_admin: m.is_admin,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PasswordOtpRequest {
    #[schema(example = "admin@eventhub.io")]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
    #[schema(example = "482913")]
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LinkSocialAccountRequest {
    pub provider: SocialProvider,
    pub provider_user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SocialLoginRequest {
    pub provider: SocialProvider,
    pub provider_user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SocialAccountResponse {
    pub id: i64,
    pub provider: SocialProvider,
    pub provider_user_id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<social_account_entity::Model> for SocialAccountResponse {
    fn from(m: social_account_entity::Model) -> Self {
        Self {
            id: m.id,
            provider: m.provider,
            provider_user_id: m.provider_user_id,
            email: m.email,
            created_at: m.created_at,
        }
    }
}
