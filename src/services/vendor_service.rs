use crate::entities::{SoftDelete, soft_delete, vendor_entity as vendors};
use crate::error::{AppError, AppResult};
use crate::models::{ListQuery, PaginatedResponse, VendorRequest, VendorResponse};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::{optional_text, require_text, validate_email};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct VendorService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

struct VendorInput {
    name: String,
    service_type: String,
    contact_email: Option<String>,
    phone: Option<String>,
}

fn validate(req: VendorRequest) -> AppResult<VendorInput> {
    let contact_email = optional_text(req.contact_email);
    if let Some(email) = &contact_email {
        validate_email(email)?;
    }
    Ok(VendorInput {
        name: require_text("name", &req.name, 255)?,
        service_type: require_text("service_type", &req.service_type, 100)?,
        contact_email,
        phone: optional_text(req.phone),
    })
}

impl VendorService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResponse<VendorResponse>> {
        let params = query.pagination();
        let mut select = vendors::Entity::find_active();
        if let Some(term) = query.search_term() {
            select = select.filter(ilike_any(
                &[vendors::Column::Name, vendors::Column::ServiceType],
                &term,
            ));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_asc(vendors::Column::Name)
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

    pub async fn get(&self, id: i64) -> AppResult<VendorResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, actor: i64, req: VendorRequest) -> AppResult<VendorResponse> {
        let input = validate(req)?;
        let now = Utc::now();
        let vendor = vendors::ActiveModel {
            name: Set(input.name),
            service_type: Set(input.service_type),
            contact_email: Set(input.contact_email),
            phone: Set(input.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.activity
            .record(
                actor,
                "vendor.created",
                "vendor",
                vendor.id,
                format!("Created vendor {}", vendor.name),
            )
            .await;
        Ok(vendor.into())
    }

    pub async fn update(&self, actor: i64, id: i64, req: VendorRequest) -> AppResult<VendorResponse> {
        let existing = self.find(id).await?;
        let input = validate(req)?;

        let mut am = existing.into_active_model();
        am.name = Set(input.name);
        am.service_type = Set(input.service_type);
        am.contact_email = Set(input.contact_email);
        am.phone = Set(input.phone);
        am.updated_at = Set(Utc::now());
        let vendor = am.update(&self.pool).await?;

        self.activity
            .record(actor, "vendor.updated", "vendor", id, format!("Updated vendor {}", vendor.name))
            .await;
        Ok(vendor.into())
    }

    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !soft_delete::soft_delete::<vendors::Entity, _>(&self.pool, id, actor).await? {
            return Err(AppError::NotFound(format!("Vendor {id} not found")));
        }
        self.activity
            .record(
                actor,
                "vendor.deleted",
                "vendor",
                id,
                format!("Moved vendor {} to the recycle bin", existing.name),
            )
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<vendors::Model> {
        vendors::Entity::find_active_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vendor {id} not found")))
    }
}
