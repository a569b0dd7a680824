use crate::entities::promo_codes::{FULL_PERCENT_BP, normalize_code};
use crate::entities::{
    ApplicableTo, DiscountType, SoftDelete, category_entity as categories, event_entity as events,
    promo_code_category_entity as code_categories, promo_code_entity as promo_codes,
    promo_code_event_entity as code_events,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CheckPromoCodeRequest, CheckPromoCodeResponse, PaginatedResponse, PaginationParams,
    PromoCodeQuery, PromoCodeRequest, PromoCodeResponse, search_term,
};
use crate::services::ActivityLogService;
use crate::services::query::ilike_any;
use crate::utils::optional_text;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

#[derive(Clone)]
pub struct PromoCodeService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

/// Event and category ids a code is restricted to.
pub(crate) async fn load_links<C: ConnectionTrait>(
    db: &C,
    promo_code_id: i64,
) -> Result<(Vec<i64>, Vec<i64>), DbErr> {
    let event_ids = code_events::Entity::find()
        .filter(code_events::Column::PromoCodeId.eq(promo_code_id))
        .all(db)
        .await?
        .into_iter()
        .map(|l| l.event_id)
        .collect();
    let category_ids = code_categories::Entity::find()
        .filter(code_categories::Column::PromoCodeId.eq(promo_code_id))
        .all(db)
        .await?
        .into_iter()
        .map(|l| l.category_id)
        .collect();
    Ok((event_ids, category_ids))
}

struct PromoInput {
    code: String,
    description: Option<String>,
    discount_type: DiscountType,
    discount_value: i64,
    applicable_to: ApplicableTo,
    event_ids: Vec<i64>,
    category_ids: Vec<i64>,
    max_uses: Option<i64>,
    max_uses_per_user: i64,
    min_order_amount: Option<i64>,
    valid_from: chrono::DateTime<Utc>,
    valid_until: chrono::DateTime<Utc>,
    is_active: bool,
}

fn validate(req: PromoCodeRequest) -> AppResult<PromoInput> {
    let code = normalize_code(&req.code);
    if code.is_empty() || code.len() > 50 {
        return Err(AppError::ValidationError(
            "code must be 1 to 50 characters".into(),
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::ValidationError(
            "code may only contain letters, digits, '-' and '_'".into(),
        ));
    }

    let discount_value = match req.discount_type {
        DiscountType::Percentage => {
            if !(1..=FULL_PERCENT_BP).contains(&req.discount_value) {
                return Err(AppError::ValidationError(
                    "percentage must be between 0.01% and 100%".into(),
                ));
            }
            req.discount_value
        }
        DiscountType::Fixed => {
            if req.discount_value <= 0 {
                return Err(AppError::ValidationError(
                    "fixed discount must be positive".into(),
                ));
            }
            req.discount_value
        }
        DiscountType::FreeTicket => 0,
    };

    if req.valid_until < req.valid_from {
        return Err(AppError::ValidationError(
            "valid_until must not be before valid_from".into(),
        ));
    }
    if req.max_uses.is_some_and(|m| m < 1) {
        return Err(AppError::ValidationError("max_uses must be at least 1".into()));
    }
    let max_uses_per_user = req.max_uses_per_user.unwrap_or(1);
    if max_uses_per_user < 1 {
        return Err(AppError::ValidationError(
            "max_uses_per_user must be at least 1".into(),
        ));
    }
    if req.min_order_amount.is_some_and(|m| m < 0) {
        return Err(AppError::ValidationError(
            "min_order_amount cannot be negative".into(),
        ));
    }

    let applicable_to = req.applicable_to.unwrap_or(ApplicableTo::All);
    let mut event_ids = req.event_ids;
    let mut category_ids = req.category_ids;
    event_ids.sort_unstable();
    event_ids.dedup();
    category_ids.sort_unstable();
    category_ids.dedup();
    match applicable_to {
        ApplicableTo::All => {
            event_ids.clear();
            category_ids.clear();
        }
        ApplicableTo::SpecificEvents => {
            if event_ids.is_empty() {
                return Err(AppError::ValidationError(
                    "specific_events requires at least one event".into(),
                ));
            }
            category_ids.clear();
        }
        ApplicableTo::SpecificCategories => {
            if category_ids.is_empty() {
                return Err(AppError::ValidationError(
                    "specific_categories requires at least one category".into(),
                ));
            }
            event_ids.clear();
        }
    }

    Ok(PromoInput {
        code,
        description: optional_text(req.description),
        discount_type: req.discount_type,
        discount_value,
        applicable_to,
        event_ids,
        category_ids,
        max_uses: req.max_uses,
        max_uses_per_user,
        min_order_amount: req.min_order_amount,
        valid_from: req.valid_from,
        valid_until: req.valid_until,
        is_active: req.is_active.unwrap_or(true),
    })
}

impl PromoCodeService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(
        &self,
        query: &PromoCodeQuery,
    ) -> AppResult<PaginatedResponse<PromoCodeResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = promo_codes::Entity::find();
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(ilike_any(
                &[promo_codes::Column::Code, promo_codes::Column::Description],
                &term,
            ));
        }
        if let Some(active) = query.is_active {
            select = select.filter(promo_codes::Column::IsActive.eq(active));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(promo_codes::Column::CreatedAt)
            .order_by_desc(promo_codes::Column::Id)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        let mut items = Vec::with_capacity(rows.len());
        for code in rows {
            let (event_ids, category_ids) = load_links(&self.pool, code.id).await?;
            items.push(PromoCodeResponse::new(code, event_ids, category_ids, now));
        }
        Ok(PaginatedResponse::new(items, params, total))
    }

    pub async fn get(&self, id: i64) -> AppResult<PromoCodeResponse> {
        let code = self.find(id).await?;
        let (event_ids, category_ids) = load_links(&self.pool, id).await?;
        Ok(PromoCodeResponse::new(code, event_ids, category_ids, Utc::now()))
    }

    pub async fn create(&self, actor: i64, req: PromoCodeRequest) -> AppResult<PromoCodeResponse> {
        let input = validate(req)?;
        self.ensure_code_free(&input.code, None).await?;
        self.ensure_targets_exist(&input).await?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let code = promo_codes::ActiveModel {
            code: Set(input.code.clone()),
            description: Set(input.description.clone()),
            discount_type: Set(input.discount_type),
            discount_value: Set(input.discount_value),
            applicable_to: Set(input.applicable_to),
            max_uses: Set(input.max_uses),
            max_uses_per_user: Set(input.max_uses_per_user),
            current_uses: Set(0),
            min_order_amount: Set(input.min_order_amount),
            valid_from: Set(input.valid_from),
            valid_until: Set(input.valid_until),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        replace_links(&txn, code.id, &input.event_ids, &input.category_ids).await?;
        txn.commit().await?;

        self.activity
            .record(
                actor,
                "promo_code.created",
                "promo_code",
                code.id,
                format!("Created promo code {}", code.code),
            )
            .await;
        Ok(PromoCodeResponse::new(code, input.event_ids, input.category_ids, now))
    }

    pub async fn update(
        &self,
        actor: i64,
        id: i64,
        req: PromoCodeRequest,
    ) -> AppResult<PromoCodeResponse> {
        let existing = self.find(id).await?;
        let input = validate(req)?;
        self.ensure_code_free(&input.code, Some(id)).await?;
        self.ensure_targets_exist(&input).await?;
        if input.max_uses.is_some_and(|m| m < existing.current_uses) {
            return Err(AppError::BusinessRule(format!(
                "Code has already been used {} times",
                existing.current_uses
            )));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let mut am = existing.into_active_model();
        am.code = Set(input.code.clone());
        am.description = Set(input.description.clone());
        am.discount_type = Set(input.discount_type);
        am.discount_value = Set(input.discount_value);
        am.applicable_to = Set(input.applicable_to);
        am.max_uses = Set(input.max_uses);
        am.max_uses_per_user = Set(input.max_uses_per_user);
        am.min_order_amount = Set(input.min_order_amount);
        am.valid_from = Set(input.valid_from);
        am.valid_until = Set(input.valid_until);
        am.is_active = Set(input.is_active);
        am.updated_at = Set(now);
        let code = am.update(&txn).await?;
        replace_links(&txn, id, &input.event_ids, &input.category_ids).await?;
        txn.commit().await?;

        self.activity
            .record(
                actor,
                "promo_code.updated",
                "promo_code",
                id,
                format!("Updated promo code {}", code.code),
            )
            .await;
        Ok(PromoCodeResponse::new(code, input.event_ids, input.category_ids, now))
    }

    /// Hard delete; refused once the code has been redeemed.
    pub async fn delete(&self, actor: i64, id: i64) -> AppResult<()> {
        let existing = self.find(id).await?;
        if existing.current_uses > 0 {
            return Err(AppError::BusinessRule(
                "Promo code has been used; deactivate it instead".into(),
            ));
        }
        let code = existing.code.clone();
        existing.delete(&self.pool).await?;

        self.activity
            .record(
                actor,
                "promo_code.deleted",
                "promo_code",
                id,
                format!("Deleted promo code {code}"),
            )
            .await;
        Ok(())
    }

    /// What the code would take off an order for the event, without redeeming it.
    pub async fn check(&self, req: CheckPromoCodeRequest) -> AppResult<CheckPromoCodeResponse> {
        let normalized = normalize_code(&req.code);
        let code = promo_codes::Entity::find()
            .filter(promo_codes::Column::Code.eq(normalized.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Promo code {normalized} not found")))?;
        let event = events::Entity::find_active_by_id(req.event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", req.event_id)))?;

        let now = Utc::now();
        if !code.is_valid(now) {
            return Err(AppError::BusinessRule("Promo code is not valid".into()));
        }
        let (event_ids, category_ids) = load_links(&self.pool, code.id).await?;
        if !code.applies_to(event.id, event.category_id, &event_ids, &category_ids) {
            return Err(AppError::BusinessRule(
                "Promo code does not apply to this event".into(),
            ));
        }
        if !code.meets_minimum(req.order_amount) {
            return Err(AppError::BusinessRule(
                "Order amount is below the code's minimum".into(),
            ));
        }

        let discount_amount = code.calculate_discount(req.order_amount, now);
        Ok(CheckPromoCodeResponse {
            code: code.code,
            discount_amount,
            total: req.order_amount - discount_amount,
        })
    }

    async fn find(&self, id: i64) -> AppResult<promo_codes::Model> {
        promo_codes::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Promo code {id} not found")))
    }

    async fn ensure_code_free(&self, code: &str, except: Option<i64>) -> AppResult<()> {
        let mut select = promo_codes::Entity::find().filter(promo_codes::Column::Code.eq(code));
        if let Some(id) = except {
            select = select.filter(promo_codes::Column::Id.ne(id));
        }
        if select.count(&self.pool).await? > 0 {
            return Err(AppError::BusinessRule(format!(
                "Promo code {code} already exists"
            )));
        }
        Ok(())
    }

    async fn ensure_targets_exist(&self, input: &PromoInput) -> AppResult<()> {
        if !input.event_ids.is_empty() {
            let found = events::Entity::find_active()
                .filter(events::Column::Id.is_in(input.event_ids.clone()))
                .count(&self.pool)
                .await?;
            if found as usize != input.event_ids.len() {
                return Err(AppError::ValidationError(
                    "Some selected events do not exist".into(),
                ));
            }
        }
        if !input.category_ids.is_empty() {
            let found = categories::Entity::find_active()
                .filter(categories::Column::Id.is_in(input.category_ids.clone()))
                .count(&self.pool)
                .await?;
            if found as usize != input.category_ids.len() {
                return Err(AppError::ValidationError(
                    "Some selected categories do not exist".into(),
                ));
            }
        }
        Ok(())
    }
}

async fn replace_links<C: ConnectionTrait>(
    db: &C,
    promo_code_id: i64,
    event_ids: &[i64],
    category_ids: &[i64],
) -> Result<(), DbErr> {
    code_events::Entity::delete_many()
        .filter(code_events::Column::PromoCodeId.eq(promo_code_id))
        .exec(db)
        .await?;
    code_categories::Entity::delete_many()
        .filter(code_categories::Column::PromoCodeId.eq(promo_code_id))
        .exec(db)
        .await?;

    for event_id in event_ids {
        code_events::ActiveModel {
            promo_code_id: Set(promo_code_id),
            event_id: Set(*event_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    for category_id in category_ids {
        code_categories::ActiveModel {
            promo_code_id: Set(promo_code_id),
            category_id: Set(*category_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::test_support::setup_db;
    use chrono::Duration;

    pub(crate) fn promo_request(code: &str, discount_type: DiscountType, value: i64) -> PromoCodeRequest {
        let now = Utc::now();
        PromoCodeRequest {
            code: code.to_string(),
            description: None,
            discount_type,
            discount_value: value,
            applicable_to: None,
            event_ids: vec![],
            category_ids: vec![],
            max_uses: None,
            max_uses_per_user: None,
            min_order_amount: None,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(30),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_and_rejects_duplicates() {
        let pool = setup_db().await;
        let svc = PromoCodeService::new(pool.clone(), ActivityLogService::new(pool));

        let c = svc
            .create(1, promo_request(" spring25 ", DiscountType::Percentage, 2500))
            .await
            .unwrap();
        assert_eq!(c.code, "SPRING25");
        assert!(c.is_valid);

        assert!(matches!(
            svc.create(1, promo_request("Spring25", DiscountType::Fixed, 500))
                .await,
            Err(AppError::BusinessRule(_))
        ));
    }

    #[tokio::test]
    async fn test_validation_rules() {
        let pool = setup_db().await;
        let svc = PromoCodeService::new(pool.clone(), ActivityLogService::new(pool));

        let over = promo_request("OVER", DiscountType::Percentage, FULL_PERCENT_BP + 1);
        assert!(matches!(svc.create(1, over).await, Err(AppError::ValidationError(_))));

        let mut window = promo_request("WINDOW", DiscountType::Fixed, 100);
        window.valid_until = window.valid_from - Duration::seconds(1);
        assert!(matches!(svc.create(1, window).await, Err(AppError::ValidationError(_))));

        let mut targeted = promo_request("TARGET", DiscountType::Fixed, 100);
        targeted.applicable_to = Some(ApplicableTo::SpecificEvents);
        assert!(matches!(svc.create(1, targeted).await, Err(AppError::ValidationError(_))));

        let mut missing = promo_request("MISSING", DiscountType::Fixed, 100);
        missing.applicable_to = Some(ApplicableTo::SpecificCategories);
        missing.category_ids = vec![404];
        assert!(matches!(svc.create(1, missing).await, Err(AppError::ValidationError(_))));

        // free tickets ignore the value
        let free = svc
            .create(1, promo_request("FREE", DiscountType::FreeTicket, 12345))
            .await
            .unwrap();
        assert_eq!(free.discount_value, 0);
    }

    #[tokio::test]
    async fn test_used_code_cannot_be_deleted() {
        let pool = setup_db().await;
        let svc = PromoCodeService::new(pool.clone(), ActivityLogService::new(pool.clone()));

        let c = svc
            .create(1, promo_request("ONCE", DiscountType::Fixed, 100))
            .await
            .unwrap();

        let model = promo_codes::Entity::find_by_id(c.id).one(&pool).await.unwrap().unwrap();
        let mut am = model.into_active_model();
        am.current_uses = Set(1);
        am.update(&pool).await.unwrap();

        assert!(matches!(svc.delete(1, c.id).await, Err(AppError::BusinessRule(_))));

        let unused = svc
            .create(1, promo_request("NEVER", DiscountType::Fixed, 100))
            .await
            .unwrap();
        svc.delete(1, unused.id).await.unwrap();
        assert!(matches!(svc.get(unused.id).await, Err(AppError::NotFound(_))));
    }
}
