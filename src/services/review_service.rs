use crate::entities::{SoftDelete, event_entity as events, review_entity as reviews, soft_delete};
use crate::entities::reviews::{MAX_RATING, MIN_RATING};
use crate::error::{AppError, AppResult};
use crate::models::{
    PaginatedResponse, PaginationParams, ReviewQuery, ReviewRequest, ReviewResponse, search_term,
};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::{optional_text, require_text, validate_email};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

struct ReviewInput {
    event_id: i64,
    reviewer_name: String,
    reviewer_email: Option<String>,
    rating: i32,
    comment: Option<String>,
    is_published: bool,
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ReviewQuery) -> AppResult<PaginatedResponse<ReviewResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = reviews::Entity::find_active();
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(ilike_any(
                &[reviews::Column::ReviewerName, reviews::Column::Comment],
                &term,
            ));
        }
        if let Some(event_id) = query.event_id {
            select = select.filter(reviews::Column::EventId.eq(event_id));
        }
        if let Some(rating) = query.rating {
            select = select.filter(reviews::Column::Rating.eq(rating));
        }
        if let Some(is_published) = query.is_published {
            select = select.filter(reviews::Column::IsPublished.eq(is_published));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
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

    pub async fn get(&self, id: i64) -> AppResult<ReviewResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: ReviewRequest) -> AppResult<ReviewResponse> {
        let input = self.validate(req).await?;
        let now = Utc::now();
        let review = reviews::ActiveModel {
            event_id: Set(input.event_id),
            reviewer_name: Set(input.reviewer_name),
            reviewer_email: Set(input.reviewer_email),
            rating: Set(input.rating),
            comment: Set(input.comment),
            is_published: Set(input.is_published),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "review.created",
                "review",
                review.id,
                format!("Added a {}-star review by {}", review.rating, review.reviewer_name),
            )
            .await;
        Ok(review.into())
    }

    pub async fn update(&self, actor: i64, id: i64, req: ReviewRequest) -> AppResult<ReviewResponse> {
        let existing = self.find(id).await?;
        let input = self.validate(req).await?;

        let mut am = existing.into_active_model();
        am.event_id = Set(input.event_id);
        am.reviewer_name = Set(input.reviewer_name);
        am.reviewer_email = Set(input.reviewer_email);
        am.rating = Set(input.rating);
        am.comment = Set(input.comment);
        am.is_published = Set(input.is_published);
        am.updated_at = Set(Utc::now());
        let review = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "review.updated",
                "review",
                id,
                format!("Updated the review by {}", review.reviewer_name),
            )
            .await;
        Ok(review.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<reviews::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Review {id} not found")));
        }
        self.activity
            .record(
                actor,
                "review.deleted",
                "review",
                id,
                format!(
                    "Moved the review by {} to the recycle bin",
                    existing.reviewer_name
                ),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<reviews::Model> {
        reviews::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {id} not found")))
    }

    async fn validate(&self, req: ReviewRequest) -> AppResult<ReviewInput> {
        let reviewer_name = require_text("reviewer_name", &req.reviewer_name, 255)?;
        if !(MIN_RATING..=MAX_RATING).contains(&req.rating) {
            return Err(AppError::ValidationError(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        let reviewer_email = optional_text(req.reviewer_email);
        if let Some(email) = &reviewer_email {
            validate_email(email)?;
        }
        if events::Entity::find_active_by_id(req.event_id)
            .one(&self.pool)
            .await?
            .is_none()
        {
            return Err(AppError::ValidationError(format!(
                "Event {} does not exist",
                req.event_id
            )));
        }

        Ok(ReviewInput {
            event_id: req.event_id,
            reviewer_name,
            reviewer_email,
            rating: req.rating,
            comment: optional_text(req.comment),
            is_published: req.is_published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;
    use crate::models::EventRequest;
    use crate::services::EventService;
    use chrono::Duration;

    async fn event_id(pool: &DatabaseConnection) -> i64 {
        let starts_at = Utc::now() + Duration::days(3);
        EventService::new(pool.clone(), ActivityLogService::new(pool.clone()))
            .create(
                1,
                EventRequest {
                    title: "Rust Nation".into(),
                    slug: None,
                    description: None,
                    category_id: None,
                    venue_id: None,
                    starts_at,
                    ends_at: starts_at + Duration::hours(6),
                    status: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn review(event_id: i64, rating: i32) -> ReviewRequest {
        ReviewRequest {
            event_id,
            reviewer_name: "Grace".into(),
            reviewer_email: None,
            rating,
            comment: Some("Great talks".into()),
            is_published: false,
        }
    }

    #[tokio::test]
    async fn test_rating_and_event_are_validated() {
        let pool = setup_db().await;
        let svc = ReviewService::new(pool.clone(), ActivityLogService::new(pool.clone()));
        let event = event_id(&pool).await;

        for rating in [0, 6, -1] {
            assert!(matches!(
                svc.create(1, review(event, rating)).await,
                Err(AppError::ValidationError(_))
            ));
        }
        assert!(matches!(
            svc.create(1, review(event + 100, 4)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            svc.create(
                1,
                ReviewRequest {
                    reviewer_email: Some("nope".into()),
                    ..review(event, 4)
                }
            )
            .await,
            Err(AppError::ValidationError(_))
        ));

        let created = svc.create(1, review(event, 5)).await.unwrap();
        assert_eq!(created.rating, 5);
        assert!(!created.is_published);
    }

    #[tokio::test]
    async fn test_review_filters_update_and_delete() {
        let pool = setup_db().await;
        let svc = ReviewService::new(pool.clone(), ActivityLogService::new(pool.clone()));
        let event = event_id(&pool).await;

        let low = svc.create(1, review(event, 2)).await.unwrap();
        svc.create(1, review(event, 5)).await.unwrap();

        let fives = svc
            .list(&ReviewQuery {
                rating: Some(5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(fives.total, 1);

        let updated = svc
            .update(
                1,
                low.id,
                ReviewRequest {
                    is_published: true,
                    ..review(event, 3)
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.rating, 3);
        let published = svc
            .list(&ReviewQuery {
                is_published: Some(true),
                event_id: Some(event),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(published.total, 1);
        assert_eq!(published.data[0].id, low.id);

        svc.delete(1, low.id).await.unwrap();
        assert!(matches!(svc.get(low.id).await, Err(AppError::NotFound(_))));
        assert_eq!(svc.list(&ReviewQuery::default()).await.unwrap().total, 1);
    }
}
