use crate::entities::page_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageRequest {
    #[schema(example = "Code of conduct")]
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<page_entity::Model> for PageResponse {
    fn from(m: page_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            content: m.content,
            is_published: m.is_published,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
