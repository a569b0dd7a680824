use crate::entities::venue_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VenueRequest {
    #[schema(example = "Harbour Hall")]
    pub name: String,
    pub address: String,
    pub city: String,
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub capacity: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<venue_entity::Model> for VenueResponse {
    fn from(m: venue_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            city: m.city,
            capacity: m.capacity,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
