//! Recycle bin: the closed set of trashable kinds and the request/response shapes.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrashKind {
    Category,
    Team,
    Event,
    Venue,
    Sponsor,
    Speaker,
    Vendor,
    Page,
    Survey,
    Review,
}

impl TrashKind {
    pub const ALL: [TrashKind; 10] = [
        TrashKind::Category,
        TrashKind::Team,
        TrashKind::Event,
        TrashKind::Venue,
        TrashKind::Sponsor,
        TrashKind::Speaker,
        TrashKind::Vendor,
        TrashKind::Page,
        TrashKind::Survey,
        TrashKind::Review,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrashKind::Category => "category",
            TrashKind::Team => "team",
            TrashKind::Event => "event",
            TrashKind::Venue => "venue",
            TrashKind::Sponsor => "sponsor",
            TrashKind::Speaker => "speaker",
            TrashKind::Vendor => "vendor",
            TrashKind::Page => "page",
            TrashKind::Survey => "survey",
            TrashKind::Review => "review",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            TrashKind::Category => "categories",
            TrashKind::Team => "teams",
            TrashKind::Event => "events",
            TrashKind::Venue => "venues",
            TrashKind::Sponsor => "sponsors",
            TrashKind::Speaker => "speakers",
            TrashKind::Vendor => "vendors",
            TrashKind::Page => "pages",
            TrashKind::Survey => "surveys",
            TrashKind::Review => "reviews",
        }
    }

    /// Column shown as the item label in the bin and matched by search.
    pub fn label_column(self) -> &'static str {
        match self {
            TrashKind::Event | TrashKind::Page | TrashKind::Survey => "title",
            TrashKind::Review => "reviewer_name",
            _ => "name",
        }
    }

    /// `None` for `all`, an error for anything else that is not a kind.
    pub fn parse_filter(value: Option<&str>) -> Result<Option<TrashKind>, AppError> {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(v) => v.parse().map(Some),
        }
    }
}

impl std::fmt::Display for TrashKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrashKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrashKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown trash type: {s}")))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TrashQuery {
    /// A kind or `all`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmptyTrashQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct TrashedItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub label: String,
    pub deleted_at: DateTime<Utc>,
    pub deleted_by: Option<i64>,
    pub deleted_by_name: Option<String>,
}

/// One `{type, id}` entry of a bulk request. `type` stays a string so that
/// unknown kinds can be reported back as skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrashItemRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkTrashRequest {
    pub items: Vec<TrashItemRef>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkTrashResult {
    pub processed: u64,
    pub skipped: Vec<TrashItemRef>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrashCount {
    #[serde(rename = "type")]
    pub kind: TrashKind,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrashCountsResponse {
    pub counts: Vec<TrashCount>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmptyTrashResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        for kind in TrashKind::ALL {
            assert_eq!(kind.as_str().parse::<TrashKind>().unwrap(), kind);
        }
        assert!(matches!(
            "order".parse::<TrashKind>(),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_filter_accepts_all() {
        assert_eq!(TrashKind::parse_filter(None).unwrap(), None);
        assert_eq!(TrashKind::parse_filter(Some("all")).unwrap(), None);
        assert_eq!(
            TrashKind::parse_filter(Some("venue")).unwrap(),
            Some(TrashKind::Venue)
        );
        assert!(TrashKind::parse_filter(Some("users")).is_err());
    }

    #[test]
    fn test_bulk_request_uses_type_key() {
        let req: BulkTrashRequest =
            serde_json::from_str(r#"{"items":[{"type":"page","id":4}]}"#).unwrap();
        assert_eq!(req.items[0].kind, "page");
        assert_eq!(req.items[0].id, 4);
    }
}
