//! Speakers, sponsors and vendors.

use crate::entities::{SponsorTier, speaker_entity, sponsor_entity, vendor_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpeakerRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpeakerResponse {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<speaker_entity::Model> for SpeakerResponse {
    fn from(m: speaker_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            title: m.title,
            company: m.company,
            bio: m.bio,
            email: m.email,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SponsorRequest {
    #[schema(example = "Acme Corp")]
    pub name: String,
    /// Defaults to `bronze`
    pub tier: Option<SponsorTier>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SponsorResponse {
    pub id: i64,
    pub name: String,
    pub tier: SponsorTier,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<sponsor_entity::Model> for SponsorResponse {
    fn from(m: sponsor_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            tier: m.tier,
            website: m.website,
            logo_url: m.logo_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorRequest {
    #[schema(example = "Fresh Catering")]
    pub name: String,
    #[schema(example = "catering")]
    pub service_type: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorResponse {
    pub id: i64,
    pub name: String,
    pub service_type: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<vendor_entity::Model> for VendorResponse {
    fn from(m: vendor_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            service_type: m.service_type,
            contact_email: m.contact_email,
            phone: m.phone,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
