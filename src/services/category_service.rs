use crate::entities::{SoftDelete, category_entity as categories, soft_delete};
use crate::error::{AppError, AppResult};
use crate::models::{CategoryRequest, CategoryResponse, ListQuery, PaginatedResponse};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::{optional_text, require_text, resolve_slug};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Parent chains longer than this are treated as corrupt.
const MAX_DEPTH: usize = 32;

#[derive(Clone)]
pub struct CategoryService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

impl CategoryService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<CategoryResponse>> {
        let params = query.pagination();
        let mut select = categories::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike_any(
                &[categories::Column::Name, categories::Column::Slug],
                &term,
            ));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(categories::Column::Name)
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

    pub async fn get(&self, id: i64) -> AppResult<CategoryResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: CategoryRequest) -> AppResult<CategoryResponse> {
        let name = require_text("name", &req.name, 255)?;
        let slug = resolve_slug(req.slug.as_deref(), &name)?;
        if let Some(parent_id) = req.parent_id {
            self.find(parent_id).await?;
        }

        let now = Utc::now();
        let model = categories::ActiveModel {
            name: Set(name),
            slug: Set(slug),
            description: Set(optional_text(req.description)),
            parent_id: Set(req.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "category.created",
                "category",
                model.id,
                format!("Created category {}", model.name),
            )
            .await;
        Ok(model.into())
    }

    pub async fn update(
        &self,
        actor: i64,
        id: i64,
        req: CategoryRequest,
    ) -> AppResult<CategoryResponse> {
        let existing = self.find(id).await?;
        let name = require_text("name", &req.name, 255)?;
        let slug = resolve_slug(req.slug.as_deref(), &name)?;
        if let Some(parent_id) = req.parent_id {
            self.check_parent(id, parent_id).await?;
        }

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.slug = Set(slug);
        am.description = Set(optional_text(req.description));
        am.parent_id = Set(req.parent_id);
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "category.updated",
                "category",
                model.id,
                format!("Updated category {}", model.name),
            )
            .await;
        Ok(model.into())
    }

    /// Moves the category to the recycle bin. Refused while any active
    /// category still points at it as parent.
    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;

        let children = categories::Entity::find_active()
            .filter(categories::Column::ParentId.eq(id))
            .count(&self.pool)
            .await?;
        if children > 0 {
            return Err(AppError::BusinessRule(format!(
                "Category {} still has {} sub-categories",
                existing.name, children
            )));
        }

        if !soft_delete::soft_delete::<categories::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Category {id} not found")));
        }

        self.activity
            .record(
                actor,
                "category.deleted",
                "category",
                id,
                format!("Moved category {} to the recycle bin", existing.name),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<categories::Model> {
        categories::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
    }

    /// The parent must be active and must not be the category itself or one
    /// of its descendants.
    async fn check_parent(&self, id: i64, parent_id: i64) -> AppResult<()> {
        if parent_id == id {
            return Err(AppError::ValidationError(
                "A category cannot be its own parent".into(),
            ));
        }

        let mut cursor = Some(self.find(parent_id).await?);
        let mut depth = 0;
        while let Some(node) = cursor {
            if node.id == id {
                return Err(AppError::ValidationError(
                    "A category cannot be moved under its own descendant".into(),
                ));
            }
            depth += 1;
            if depth > MAX_DEPTH {
                break;
            }
            cursor = match node.parent_id {
                Some(pid) => categories::Entity::find_active_by_id(pid)
                    .one(&self.pool)
                    .await?,
                None => None,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;
    use sea_orm::EntityTrait;

    fn request(name: &str, parent_id: Option<i64>) -> CategoryRequest {
        CategoryRequest {
            name: name.to_string(),
            slug: None,
            description: None,
            parent_id,
        }
    }

    async fn service() -> CategoryService {
        let pool = setup_db().await;
        CategoryService::new(pool.clone(), ActivityLogService::new(pool))
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let svc = service().await;
        let c = svc.create(1, request("Live Music", None)).await.unwrap();
        assert_eq!(c.slug, "live-music");
        assert!(svc.create(1, request("   ", None)).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_with_active_child_is_rejected() {
        let svc = service().await;
        let parent = svc.create(1, request("Sports", None)).await.unwrap();
        svc.create(1, request("Football", Some(parent.id)))
            .await
            .unwrap();

        let err = svc.delete(1, parent.id).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        // Still active and listed
        let row = categories::Entity::find_by_id(parent.id)
            .one(&svc.pool)
            .await
            .unwrap()
            .unwrap();
        assert!(row.deleted_at.is_none());
        assert!(svc.get(parent.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_after_child_is_trashed() {
        let svc = service().await;
        let parent = svc.create(1, request("Arts", None)).await.unwrap();
        let child = svc.create(1, request("Theatre", Some(parent.id))).await.unwrap();

        svc.delete(1, child.id).await.unwrap();
        svc.delete(1, parent.id).await.unwrap();

        assert!(matches!(svc.get(parent.id).await, Err(AppError::NotFound(_))));
        let listed = svc.list(&ListQuery::default()).await.unwrap();
        assert_eq!(listed.total, 0);
    }

    #[tokio::test]
    async fn test_parent_cycles_are_rejected() {
        let svc = service().await;
        let a = svc.create(1, request("A", None)).await.unwrap();
        let b = svc.create(1, request("B", Some(a.id))).await.unwrap();

        let err = svc.update(1, a.id, request("A", Some(a.id))).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = svc.update(1, a.id, request("A", Some(b.id))).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let svc = service().await;
        svc.create(1, request("Workshops", None)).await.unwrap();
        svc.create(1, request("Concerts", None)).await.unwrap();

        let found = svc
            .list(&ListQuery {
                search: Some("WORK".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.data[0].name, "Workshops");
    }
}
