use crate::entities::ticket_type_entity as ticket_types;
use crate::error::{AppError, AppResult};
use crate::models::{TicketTypeRequest, TicketTypeResponse};
use crate::services::{ActivityLogService, EventService};
use crate::utils::require_text;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct TicketTypeService {
    pool: DatabaseConnection,
    events: EventService,
    activity: ActivityLogService,
}

fn validate(req: &TicketTypeRequest) -> AppResult<String> {
    let name = require_text("name", &req.name, 255)?;
    if req.price < 0 {
        return Err(AppError::ValidationError("price cannot be negative".into()));
    }
    if req.quantity < 0 {
        return Err(AppError::ValidationError(
            "quantity cannot be negative".into(),
        ));
    }
    Ok(name)
}

impl TicketTypeService {
    pub fn new(pool: DatabaseConnection, events: EventService, activity: ActivityLogService) -> Self {
        Self {
            pool,
            events,
            activity,
        }
    }

    pub async fn list_for_event(&self, event_id: i64) -> AppResult<Vec<TicketTypeResponse>> {
        self.events.find(event_id).await?;
        let rows = ticket_types::Entity::find()
            .filter(ticket_types::Column::EventId.eq(event_id))
            .order_by_asc(ticket_types::Column::Price)
            .order_by_asc(ticket_types::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<TicketTypeResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(
        &self,
        actor: i64,
        event_id: i64,
        req: TicketTypeRequest,
    ) -> AppResult<TicketTypeResponse> {
        let event = self.events.find(event_id).await?;
        let name = validate(&req)?;

        let now = Utc::now();
        let ticket = ticket_types::ActiveModel {
            event_id: Set(event.id),
            name: Set(name),
            price: Set(req.price),
            quantity: Set(req.quantity),
            quantity_sold: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "ticket_type.created",
                "ticket_type",
                ticket.id,
                format!("Added ticket type {} to {}", ticket.name, event.title),
            )
            .await;
        Ok(ticket.into())
    }

    /// The quantity may not drop below what has already been sold.
    pub async fn update(
        &self,
        actor: i64,
        id: i64,
        req: TicketTypeRequest,
    ) -> AppResult<TicketTypeResponse> {
        let existing = self.find(id).await?;
        let name = validate(&req)?;
        if req.quantity < existing.quantity_sold {
            return Err(AppError::BusinessRule(format!(
                "{} tickets are already sold",
                existing.quantity_sold
            )));
        }

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.price = Set(req.price);
        am.quantity = Set(req.quantity);
        am.updated_at = Set(Utc::now());
        let ticket = am.update(&self.pool).await?;

        self.activity
            .record(
                actor,
                "ticket_type.updated",
                "ticket_type",
                id,
                format!("Updated ticket type {}", ticket.name),
            )
            .await;
        Ok(ticket.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if existing.quantity_sold > 0 {
            return Err(AppError::BusinessRule(
                "Ticket type has sales and cannot be deleted".into(),
            ));
        }
        let name = existing.name.clone();
        existing.delete(&self.pool).await?;

        self.activity
            .record(
                actor,
                "ticket_type.deleted",
                "ticket_type",
                id,
                format!("Deleted ticket type {name}"),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<ticket_types::Model> {
        ticket_types::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket type {id} not found")))
    }
}
