use crate::entities::{SoftDelete, event_entity as events, soft_delete, survey_entity as surveys};
use crate::error::{AppError, AppResult};
use crate::models::{
    PaginatedResponse, PaginationParams, SurveyQuery, SurveyRequest, SurveyResponse, search_term,
};
use crate::services::ActivityLogService;
use crate::services::query::ilike;
use crate::utils::{optional_text, require_text};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct SurveyService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

struct SurveyInput {
    title: String,
    description: Option<String>,
    event_id: Option<i64>,
    opens_at: Option<DateTime<Utc>>,
    closes_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl SurveyService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &SurveyQuery) -> AppResult<PaginatedResponse<SurveyResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = surveys::Entity::find_active();
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(ilike(surveys::Column::Title, &term));
        }
        if let Some(event_id) = query.event_id {
            select = select.filter(surveys::Column::EventId.eq(event_id));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(surveys::Column::IsActive.eq(is_active));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(surveys::Column::CreatedAt)
            .order_by_desc(surveys::Column::Id)
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

    pub async fn get(&self, id: i64) -> AppResult<SurveyResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: SurveyRequest) -> AppResult<SurveyResponse> {
        let input = self.validate(req).await?;
        let now = Utc::now();
        let survey = surveys::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            event_id: Set(input.event_id),
            opens_at: Set(input.opens_at),
            closes_at: Set(input.closes_at),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "survey.created",
                "survey",
                survey.id,
                format!("Created survey {}", survey.title),
            )
            .await;
        Ok(survey.into())
    }

    pub async fn update(&self, actor: i64, id: i64, req: SurveyRequest) -> AppResult<SurveyResponse> {
        let existing = self.find(id).await?;
        let input = self.validate(req).await?;

        let mut am = existing.into_active_model();
        am.title = Set(input.title);
        am.description = Set(input.description);
        am.event_id = Set(input.event_id);
        am.opens_at = Set(input.opens_at);
        am.closes_at = Set(input.closes_at);
        am.is_active = Set(input.is_active);
        am.updated_at = Set(Utc::now());
        let survey = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "survey.updated",
                "survey",
                id,
                format!("Updated survey {}", survey.title),
            )
            .await;
        Ok(survey.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<surveys::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Survey {id} not found")));
        }
        self.activity
            .record(
                actor,
                "survey.deleted",
                "survey",
                id,
                format!("Moved survey {} to the recycle bin", existing.title),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<surveys::Model> {
        surveys::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Survey {id} not found")))
    }

    async fn validate(&self, req: SurveyRequest) -> AppResult<SurveyInput> {
        let title = require_text("title", &req.title, 255)?;
        if let (Some(opens_at), Some(closes_at)) = (req.opens_at, req.closes_at)
            && closes_at <= opens_at
        {
            return Err(AppError::ValidationError(
                "closes_at must be after opens_at".into(),
            ));
        }
        if let Some(event_id) = req.event_id
            && events::Entity::find_active_by_id(event_id)
                .one(&self.pool)
                .await?
                .is_none()
        {
            return Err(AppError::ValidationError(format!(
                "Event {event_id} does not exist"
            )));
        }

        Ok(SurveyInput {
            title,
            description: optional_text(req.description),
            event_id: req.event_id,
            opens_at: req.opens_at,
            closes_at: req.closes_at,
            is_active: req.is_active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;
    use chrono::Duration;

    fn survey(title: &str) -> SurveyRequest {
        SurveyRequest {
            title: title.into(),
            description: None,
            event_id: None,
            opens_at: None,
            closes_at: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_survey_window_and_event_are_validated() {
        let pool = setup_db().await;
        let svc = SurveyService::new(pool.clone(), ActivityLogService::new(pool));

        let now = Utc::now();
        let backwards = SurveyRequest {
            opens_at: Some(now),
            closes_at: Some(now - Duration::hours(1)),
            ..survey("Backwards")
        };
        assert!(matches!(
            svc.create(1, backwards).await,
            Err(AppError::ValidationError(_))
        ));

        let orphan = SurveyRequest {
            event_id: Some(404),
            ..survey("Orphan")
        };
        assert!(matches!(
            svc.create(1, orphan).await,
            Err(AppError::ValidationError(_))
        ));

        let created = svc
            .create(
                1,
                SurveyRequest {
                    opens_at: Some(now - Duration::days(1)),
                    closes_at: Some(now + Duration::days(1)),
                    ..survey("  Speaker ratings ")
                },
            )
            .await
            .unwrap();
        assert_eq!(created.title, "Speaker ratings");
        assert!(created.is_active);
        assert!(created.is_open);
    }

    #[tokio::test]
    async fn test_survey_filters_and_trash() {
        let pool = setup_db().await;
        let svc = SurveyService::new(pool.clone(), ActivityLogService::new(pool));

        let a = svc.create(1, survey("Venue feedback")).await.unwrap();
        svc.create(
            1,
            SurveyRequest {
                is_active: Some(false),
                ..survey("Catering feedback")
            },
        )
        .await
        .unwrap();

        let inactive = svc
            .list(&SurveyQuery {
                is_active: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(inactive.total, 1);
        assert!(!inactive.data[0].is_open);

        let venue = svc
            .list(&SurveyQuery {
                search: Some("VENUE".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(venue.total, 1);

        svc.delete(1, a.id).await.unwrap();
        assert!(matches!(svc.get(a.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete(1, a.id).await, Err(AppError::NotFound(_))));
        assert_eq!(svc.list(&SurveyQuery::default()).await.unwrap().total, 1);
    }
}
