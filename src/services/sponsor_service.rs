use crate::entities::{SoftDelete, SponsorTier, soft_delete, sponsor_entity as sponsors};
use crate::error::{AppError, AppResult};
use crate::models::{ListQuery, PaginatedResponse, SponsorRequest, SponsorResponse};
use crate::services::ActivityLogService;
use crate::services::query::ilike;
use crate::utils::{optional_text, require_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct SponsorService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

impl SponsorService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<SponsorResponse>> {
        let params = query.pagination();
        let mut select = sponsors::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike(sponsors::Column::Name, &term));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(sponsors::Column::Name)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            params,
            total,
        ))
    }

    pub async fn get(&self, id: i64) -> AppResult<SponsorResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: SponsorRequest) -> AppResult<SponsorResponse> {
        let name = require_text("name", &req.name, 255)?;
        let now = Utc::now();
        let sponsor = sponsors::ActiveModel {
            name: Set(name),
            tier: Set(req.tier.unwrap_or(SponsorTier::Bronze)),
            website: Set(optional_text(req.website)),
            logo_url: Set(optional_text(req.logo_url)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "sponsor.created",
                "sponsor",
                sponsor.id,
                format!("Created sponsor {}", sponsor.name),
            )
            .await;
        Ok(sponsor.into())
    }

    pub async fn update(
        &self,
        actor: i64,
        id: i64,
        req: SponsorRequest,
    ) -> AppResult<SponsorResponse> {
        let existing = self.find(id).await?;
        let name = require_text("name", &req.name, 255)?;
        let tier = req.tier.unwrap_or(existing.tier);

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.tier = Set(tier);
        am.website = Set(optional_text(req.website));
        am.logo_url = Set(optional_text(req.logo_url));
        am.updated_at = Set(Utc::now());
        let sponsor = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "sponsor.updated",
                "sponsor",
                id,
                format!("Updated sponsor {}", sponsor.name),
            )
            .await;
        Ok(sponsor.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<sponsors::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Sponsor {id} not found")));
        }
        self.activity
            .record(
                actor,
                "sponsor.deleted",
                "sponsor",
                id,
                format!("Moved sponsor {} to the recycle bin", existing.name),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<sponsors::Model> {
        sponsors::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sponsor {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;

    #[tokio::test]
    async fn test_tier_defaults_and_is_kept_on_update() {
        let pool = setup_db().await;
        let svc = SponsorService::new(pool.clone(), ActivityLogService::new(pool));

        let s = svc
            .create(
                1,
                SponsorRequest {
                    name: "Acme".into(),
                    tier: None,
                    website: None,
                    logo_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(s.tier, SponsorTier::Bronze);

        let s = svc
            .update(
                1,
                s.id,
                SponsorRequest {
                    name: "Acme".into(),
                    tier: Some(SponsorTier::Gold),
                    website: Some("https://acme.test".into()),
                    logo_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(s.tier, SponsorTier::Gold);

        let s = svc
            .update(
                1,
                s.id,
                SponsorRequest {
                    name: "Acme Corp".into(),
                    tier: None,
                    website: None,
                    logo_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(s.tier, SponsorTier::Gold);
        assert_eq!(s.website, None);
    }
}
