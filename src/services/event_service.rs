use crate::entities::{
    EventStatus, SoftDelete, category_entity as categories, event_entity as events, soft_delete,
    venue_entity as venues,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    EventQuery, EventRequest, EventResponse, EventSortBy, PaginatedResponse, PaginationParams,
    SortDir, search_term,
};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::{optional_text, require_text, resolve_slug};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

struct EventInput {
    title: String,
    slug: String,
    description: Option<String>,
    category_id: Option<i64>,
    venue_id: Option<i64>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    status: Option<EventStatus>,
}

impl EventService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<PaginatedResponse<EventResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = events::Entity::find_active();
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(ilike_any(
                &[events::Column::Title, events::Column::Slug],
                &term,
            ));
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(events::Column::CategoryId.eq(category_id));
        }
        if let Some(venue_id) = query.venue_id {
            select = select.filter(events::Column::VenueId.eq(venue_id));
        }
        if let Some(status) = query.status {
            select = select.filter(events::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await?;

        let sort_col = match query.sort_by.unwrap_or_default() {
            EventSortBy::StartsAt => events::Column::StartsAt,
            EventSortBy::Title => events::Column::Title,
            EventSortBy::CreatedAt => events::Column::CreatedAt,
        };
        let order = match query.sort_dir.unwrap_or_default() {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };

        let items = select
            .order_by(sort_col, order)
            .order_by_asc(events::Column::Id)
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

    pub async fn get(&self, id: i64) -> AppResult<EventResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: EventRequest) -> AppResult<EventResponse> {
        let input = self.validate(req).await?;
        let now = Utc::now();
        let event = events::ActiveModel {
            title: Set(input.title),
            slug: Set(input.slug),
            description: Set(input.description),
            category_id: Set(input.category_id),
            venue_id: Set(input.venue_id),
            starts_at: Set(input.starts_at),
            ends_at: Set(input.ends_at),
            status: Set(input.status.unwrap_or(EventStatus::Draft)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(actor, "event.created", "event", event.id, format!("Created event {}", event.title))
            .await;
        Ok(event.into())
    }

    pub async fn update(&self, actor: i64, id: i64, req: EventRequest) -> AppResult<EventResponse> {
        let existing = self.find(id).await?;
        let input = self.validate(req).await?;
        let status = input.status.unwrap_or(existing.status);

        let mut am = existing.into_active_model();
        am.title = Set(input.title);
        am.slug = Set(input.slug);
        am.description = Set(input.description);
        am.category_id = Set(input.category_id);
        am.venue_id = Set(input.venue_id);
        am.starts_at = Set(input.starts_at);
        am.ends_at = Set(input.ends_at);
        am.status = Set(status);
        am.updated_at = Set(Utc::now());
        let event = am.update(&self.pool).await?;

        self.activity
            .record(actor, "event.updated", "event", id, format!("Updated event {}", event.title))
            .await;
        Ok(event.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<events::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Event {id} not found")));
        }
        self.activity
            .record(
                actor,
                "event.deleted",
                "event",
                id,
                format!("Moved event {} to the recycle bin", existing.title),
            )
            .await;
        Ok(())
    }

    pub(crate) async fn find(&self, id: i64) -> AppResult<events::Model> {
        events::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))
    }

    async fn validate(&self, req: EventRequest) -> AppResult<EventInput> {
        let title = require_text("title", &req.title, 255)?;
        let slug = resolve_slug(req.slug.as_deref(), &title)?;
        if req.ends_at <= req.starts_at {
            return Err(AppError::ValidationError(
                "ends_at must be after starts_at".into(),
            ));
        }

        if let Some(category_id) = req.category_id
            && categories::Entity::find_active_by_id(category_id)
                .one(&self.pool)
                .await?
                .is_none()
        {
            return Err(AppError::ValidationError(format!(
                "Category {category_id} does not exist"
            )));
        }
        if let Some(venue_id) = req.venue_id
            && venues::Entity::find_active_by_id(venue_id)
                .one(&self.pool)
                .await?
                .is_none()
        {
            return Err(AppError::ValidationError(format!(
                "Venue {venue_id} does not exist"
            )));
        }

        Ok(EventInput {
            title,
            slug,
            description: optional_text(req.description),
            category_id: req.category_id,
            venue_id: req.venue_id,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            status: req.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;
    use crate::models::VenueRequest;
    use crate::services::VenueService;
    use chrono::Duration;

    fn event_request(title: &str, days_from_now: i64) -> EventRequest {
        let starts_at = Utc::now() + Duration::days(days_from_now);
        EventRequest {
            title: title.to_string(),
            slug: None,
            description: None,
            category_id: None,
            venue_id: None,
            starts_at,
            ends_at: starts_at + Duration::hours(8),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_dates_are_validated() {
        let pool = setup_db().await;
        let svc = EventService::new(pool.clone(), ActivityLogService::new(pool));

        let mut req = event_request("Broken", 1);
        req.ends_at = req.starts_at;
        assert!(matches!(
            svc.create(1, req).await,
            Err(AppError::ValidationError(_))
        ));

        let mut req = event_request("Nowhere", 1);
        req.venue_id = Some(999);
        assert!(matches!(
            svc.create(1, req).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_filters_and_sorting() {
        let pool = setup_db().await;
        let activity = ActivityLogService::new(pool.clone());
        let svc = EventService::new(pool.clone(), activity.clone());
        let venue_svc = VenueService::new(pool, activity);

        let venue = venue_svc
            .create(
                1,
                VenueRequest {
                    name: "Dome".into(),
                    address: "2 Ring Rd".into(),
                    city: "Perth".into(),
                    capacity: None,
                },
            )
            .await
            .unwrap();

        let mut a = event_request("Alpha", 10);
        a.venue_id = Some(venue.id);
        a.status = Some(EventStatus::Published);
        svc.create(1, a).await.unwrap();
        svc.create(1, event_request("Bravo", 5)).await.unwrap();
        svc.create(1, event_request("Charlie", 1)).await.unwrap();

        let by_start = svc.list(&EventQuery::default()).await.unwrap();
        let titles: Vec<_> = by_start.data.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Charlie", "Bravo", "Alpha"]);

        let by_title_desc = svc
            .list(&EventQuery {
                sort_by: Some(EventSortBy::Title),
                sort_dir: Some(SortDir::Desc),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_title_desc.data[0].title, "Charlie");

        let at_venue = svc
            .list(&EventQuery {
                venue_id: Some(venue.id),
                status: Some(EventStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(at_venue.total, 1);
        assert_eq!(at_venue.data[0].title, "Alpha");

        // the venue hosts an active event
        assert!(matches!(
            venue_svc.delete(1, venue.id).await,
            Err(AppError::BusinessRule(_))
        ));
    }
}
