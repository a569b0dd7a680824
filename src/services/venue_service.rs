use crate::entities::{SoftDelete, event_entity as events, soft_delete, venue_entity as venues};
use crate::error::{AppError, AppResult};
use crate::models::{ListQuery, PaginatedResponse, VenueRequest, VenueResponse};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::require_text;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct VenueService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

struct VenueInput {
    name: String,
    address: String,
    city: String,
    capacity: Option<i64>,
}

fn validate(req: VenueRequest) -> AppResult<VenueInput> {
    if req.capacity.is_some_and(|c| c < 0) {
        return Err(AppError::ValidationError(
            "capacity cannot be negative".into(),
        ));
    }
    Ok(VenueInput {
        name: require_text("name", &req.name, 255)?,
        address: require_text("address", &req.address, 500)?,
        city: require_text("city", &req.city, 120)?,
        capacity: req.capacity,
    })
}

impl VenueService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<VenueResponse>> {
        let params = query.pagination();
        let mut select = venues::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike_any(
                &[venues::Column::Name, venues::Column::City],
                &term,
            ));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(venues::Column::Name)
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

    pub async fn get(&self, id: i64) -> AppResult<VenueResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: VenueRequest) -> AppResult<VenueResponse> {
        let input = validate(req)?;
        let now = Utc::now();
        let venue = venues::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            city: Set(input.city),
            capacity: Set(input.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(actor, "venue.created", "venue", venue.id, format!("Created venue {}", venue.name))
            .await;
        Ok(venue.into())
    }

    pub async fn update(&self, actor: i64, id: i64, req: VenueRequest) -> AppResult<VenueResponse> {
        let existing = self.find(id).await?;
        let input = validate(req)?;

        let mut am = existing.into_active_model();
        am.name = Set(input.name);
        am.address = Set(input.address);
        am.city = Set(input.city);
        am.capacity = Set(input.capacity);
        am.updated_at = Set(Utc::now());
        let venue = am.update(&self.pool).await?;

        self.activity
            .record(actor, "venue.updated", "venue", id, format!("Updated venue {}", venue.name))
            .await;
        Ok(venue.into())
    }

    /// Refused while active events are held at the venue.
    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        let in_use = events::Entity::find_active()
            .filter(events::Column::VenueId.eq(id))
            .count(&self.pool)
            .await?;
        if in_use > 0 {
            return Err(AppError::BusinessRule(format!(
                "Venue {} is used by {} events",
                existing.name, in_use
            )));
        }

        if !soft_delete::soft_delete::<venues::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Venue {id} not found")));
        }
        self.activity
            .record(
                actor,
                "venue.deleted",
                "venue",
                id,
                format!("Moved venue {} to the recycle bin", existing.name),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<venues::Model> {
        venues::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_db;

    fn hall(name: &str) -> VenueRequest {
        VenueRequest {
            name: name.into(),
            address: "1 Harbour St".into(),
            city: "Sydney".into(),
            capacity: Some(500),
        }
    }

    #[tokio::test]
    async fn test_crud_and_validation() {
        let pool = setup_db().await;
        let svc = VenueService::new(pool.clone(), ActivityLogService::new(pool));

        let v = svc.create(1, hall("Hall A")).await.unwrap();
        let mut req = hall("Hall A2");
        req.capacity = None;
        let updated = svc.update(1, v.id, req).await.unwrap();
        assert_eq!(updated.name, "Hall A2");
        assert_eq!(updated.capacity, None);

        let mut bad = hall("Hall B");
        bad.capacity = Some(-1);
        assert!(matches!(
            svc.create(1, bad).await,
            Err(AppError::ValidationError(_))
        ));

        svc.delete(1, v.id).await.unwrap();
        assert!(matches!(svc.delete(1, v.id).await, Err(AppError::NotFound(_))));
    }
}
