use crate::entities::{ApplicableTo, DiscountType, promo_code_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromoCodeRequest {
    /// Stored upper-cased
    #[schema(example = "SPRING25")]
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Basis points for `percentage`, cents for `fixed`, ignored for `free_ticket`
    #[schema(example = 2500)]
    pub discount_value: i64,
    /// Defaults to `all`
    pub applicable_to: Option<ApplicableTo>,
    #[serde(default)]
    pub event_ids: Vec<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    pub max_uses: Option<i64>,
    /// Defaults to 1
    pub max_uses_per_user: Option<i64>,
    pub min_order_amount: Option<i64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PromoCodeQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromoCodeResponse {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub applicable_to: ApplicableTo,
    pub event_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub max_uses: Option<i64>,
    pub max_uses_per_user: i64,
    pub current_uses: i64,
    pub min_order_amount: Option<i64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    /// Redeemable right now
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromoCodeResponse {
    pub fn new(
        m: promo_code_entity::Model,
        event_ids: Vec<i64>,
        category_ids: Vec<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            is_valid: m.is_valid(now),
            id: m.id,
            code: m.code,
            description: m.description,
            discount_type: m.discount_type,
            discount_value: m.discount_value,
            applicable_to: m.applicable_to,
            event_ids,
            category_ids,
            max_uses: m.max_uses,
            max_uses_per_user: m.max_uses_per_user,
            current_uses: m.current_uses,
            min_order_amount: m.min_order_amount,
            valid_from: m.valid_from,
            valid_until: m.valid_until,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Preview of what a code would take off an order, without redeeming it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckPromoCodeRequest {
    pub code: String,
    pub event_id: i64,
    /// Cents
    pub order_amount: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckPromoCodeResponse {
    pub code: String,
    pub discount_amount: i64,
    pub total: i64,
}
