use crate::entities::{OrderStatus, order_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub user_id: i64,
    pub ticket_type_id: i64,
    #[schema(example = 2)]
    pub quantity: i64,
    #[schema(example = "SPRING25")]
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderQuery {
    /// Matches the order number
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub user_id: Option<i64>,
    pub event_id: Option<i64>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub event_id: Option<i64>,
    pub ticket_type_id: Option<i64>,
    pub quantity: i64,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub total: i64,
    pub promo_code_id: Option<i64>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            order_number: m.order_number,
            user_id: m.user_id,
            event_id: m.event_id,
            ticket_type_id: m.ticket_type_id,
            quantity: m.quantity,
            subtotal: m.subtotal,
            discount_amount: m.discount_amount,
            total: m.total,
            promo_code_id: m.promo_code_id,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
