use crate::entities::{EventStatus, event_entity, ticket_type_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventRequest {
    #[schema(example = "RustConf 2025")]
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Defaults to `draft`
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventSortBy {
    #[default]
    StartsAt,
    Title,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EventQuery {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub status: Option<EventStatus>,
    pub sort_by: Option<EventSortBy>,
    pub sort_dir: Option<SortDir>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<event_entity::Model> for EventResponse {
    fn from(m: event_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            description: m.description,
            category_id: m.category_id,
            venue_id: m.venue_id,
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketTypeRequest {
    #[schema(example = "Early bird")]
    pub name: String,
    /// Cents
    #[schema(example = 4900)]
    pub price: i64,
    #[schema(example = 200)]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketTypeResponse {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub quantity_sold: i64,
    pub remaining: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ticket_type_entity::Model> for TicketTypeResponse {
    fn from(m: ticket_type_entity::Model) -> Self {
        Self {
            remaining: m.remaining(),
            id: m.id,
            event_id: m.event_id,
            name: m.name,
            price: m.price,
            quantity: m.quantity,
            quantity_sold: m.quantity_sold,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
