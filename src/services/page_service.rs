use crate::entities::{SoftDelete, page_entity as pages, soft_delete};
use crate::error::{AppError, AppResult};
use crate::models::{ListQuery, PageRequest, PageResponse, PaginatedResponse};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::{require_text, resolve_slug};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct PageService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

impl PageService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<PageResponse>> {
        let params = query.pagination();
        let mut select = pages::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike_any(
                &[pages::Column::Title, pages::Column::Slug],
                &term,
            ));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(pages::Column::Title)
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

    pub async fn get(&self, id: i64) -> AppResult<PageResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: PageRequest) -> AppResult<PageResponse> {
        let title = require_text("title", &req.title, 255)?;
        let slug = resolve_slug(req.slug.as_deref(), &title)?;
        self.ensure_slug_free(&slug, None).await?;

        let now = Utc::now();
        let page = pages::ActiveModel {
            title: Set(title),
            slug: Set(slug),
            content: Set(req.content),
            is_published: Set(req.is_published),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(actor, "page.created", "page", page.id, format!("Created page {}", page.title))
            .await;
        Ok(page.into())
    }

    pub async fn update(&self, actor: i64, id: i64, req: PageRequest) -> AppResult<PageResponse> {
        let existing = self.find(id).await?;
        let title = require_text("title", &req.title, 255)?;
        let slug = resolve_slug(req.slug.as_deref(), &title)?;
        self.ensure_slug_free(&slug, Some(id)).await?;

        let mut am = existing.into_active_model();
        am.title = Set(title);
        am.slug = Set(slug);
        am.content = Set(req.content);
        am.is_published = Set(req.is_published);
        am.updated_at = Set(Utc::now());
        let page = am.update(&self.pool).await?;

        self.activity
            .record(actor, "page.updated", "page", id, format!("Updated page {}", page.title))
            .await;
        Ok(page.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<pages::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Page {id} not found")));
        }
        self.activity
            .record(
                actor,
                "page.deleted",
                "page",
                id,
                format!("Moved page {} to the recycle bin", existing.title),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<pages::Model> {
        pages::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page {id} not found")))
    }

    /// Slugs are unique across active and trashed pages.
    async fn ensure_slug_free(&self, slug: &str, except: Option<i64>) -> AppResult<()> {
        let mut select = pages::Entity::find().filter(pages::Column::Slug.eq(slug));
        if let Some(id) = except {
            select = select.filter(pages::Column::Id.ne(id));
        }
        if select.count(&self.pool).await? > 0 {
            return Err(AppError::BusinessRule(format!(
                "Slug {slug} is already used by another page"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;

    fn page(title: &str) -> PageRequest {
        PageRequest {
            title: title.into(),
            slug: None,
            content: "Be kind.".into(),
            is_published: true,
        }
    }

    #[tokio::test]
    async fn test_slug_must_be_unique_including_trash() {
        let pool = setup_db().await;
        let svc = PageService::new(pool.clone(), ActivityLogService::new(pool));

        let p = svc.create(1, page("Code of Conduct")).await.unwrap();
        assert_eq!(p.slug, "code-of-conduct");
        svc.delete(1, p.id).await.unwrap();

        assert!(matches!(
            svc.create(1, page("Code of conduct")).await,
            Err(AppError::BusinessRule(_))
        ));

        let other = svc.create(1, page("FAQ")).await.unwrap();
        // re-saving with its own slug is fine
        assert!(svc.update(1, other.id, page("FAQ")).await.is_ok());
    }
}
