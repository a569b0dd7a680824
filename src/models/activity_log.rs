use crate::entities::activity_log_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ActivityLogQuery {
    pub user_id: Option<i64>,
    #[schema(example = "category.deleted")]
    pub action: Option<String>,
    #[schema(example = "category")]
    pub subject_type: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityLogResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub subject_type: Option<String>,
    pub subject_id: Option<i64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<activity_log_entity::Model> for ActivityLogResponse {
    fn from(m: activity_log_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            action: m.action,
            subject_type: m.subject_type,
            subject_id: m.subject_id,
            description: m.description,
            created_at: m.created_at,
        }
    }
}
