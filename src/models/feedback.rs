//! Surveys and attendee reviews.

use crate::entities::{review_entity, survey_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurveyRequest {
    #[schema(example = "Post-conference feedback")]
    pub title: String,
    pub description: Option<String>,
    /// Attach the survey to one event; `null` for a general survey
    pub event_id: Option<i64>,
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SurveyResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_id: Option<i64>,
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Whether responses are accepted right now
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<survey_entity::Model> for SurveyResponse {
    fn from(m: survey_entity::Model) -> Self {
        let is_open = m.is_open(Utc::now());
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            event_id: m.event_id,
            opens_at: m.opens_at,
            closes_at: m.closes_at,
            is_active: m.is_active,
            is_open,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SurveyQuery {
    pub search: Option<String>,
    pub event_id: Option<i64>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub event_id: i64,
    #[schema(example = "Grace Hopper")]
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    /// 1 to 5
    #[schema(example = 4)]
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub event_id: i64,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<review_entity::Model> for ReviewResponse {
    fn from(m: review_entity::Model) -> Self {
        Self {
            id: m.id,
            event_id: m.event_id,
            reviewer_name: m.reviewer_name,
            reviewer_email: m.reviewer_email,
            rating: m.rating,
            comment: m.comment,
            is_published: m.is_published,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewQuery {
    pub search: Option<String>,
    pub event_id: Option<i64>,
    pub rating: Option<i32>,
    pub is_published: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}
