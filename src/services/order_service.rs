use crate::entities::promo_codes::normalize_code;
use crate::entities::{
    EventStatus, OrderStatus, SoftDelete, event_entity as events, order_entity as orders,
    promo_code_entity as promo_codes, promo_code_usage_entity as usages,
    ticket_type_entity as ticket_types, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    OrderQuery, OrderResponse, PaginatedResponse, PaginationParams, PlaceOrderRequest,
    search_term,
};
use crate::services::ActivityLogService;
use crate::services::promo_code_service::load_links;
use crate::services::query::ilike;
use crate::utils::generate_order_number;
use chrono::Utc;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    activity: ActivityLogService,
}

/// A promo code that passed every check for the order being placed.
struct Redemption {
    promo_code_id: i64,
    code: String,
    discount: i64,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, activity: ActivityLogService) -> Self {
        Self { pool, activity }
    }

    pub async fn list(&self, query: &OrderQuery) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = orders::Entity::find();
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(ilike(orders::Column::OrderNumber, &term));
        }
        if let Some(status) = query.status {
            select = select.filter(orders::Column::Status.eq(status));
        }
        if let Some(user_id) = query.user_id {
            select = select.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(event_id) = query.event_id {
            select = select.filter(orders::Column::EventId.eq(event_id));
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
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

    pub async fn get(&self, id: i64) -> AppResult<OrderResponse> {
        orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))
    }

    /// Places an order in one transaction.
    ///
    /// 1. the ticket type and its active, bookable event must exist
    /// 2. an optional promo code must be valid now, apply to the event, meet
    ///    the minimum and be under the per-user limit
    /// 3. the code's `current_uses` is bumped only while under `max_uses`
    /// 4. `quantity_sold` is bumped only while enough tickets remain
    /// 5. order and usage rows are written
    pub async fn place_order(
        &self,
        actor: i64,
        req: PlaceOrderRequest,
    ) -> AppResult<OrderResponse> {
        if req.quantity < 1 {
            return Err(AppError::ValidationError(
                "quantity must be at least 1".into(),
            ));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let ticket = ticket_types::Entity::find_by_id(req.ticket_type_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Ticket type {} not found", req.ticket_type_id))
            })?;
        let event = events::Entity::find_active_by_id(ticket.event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", ticket.event_id)))?;
        if matches!(event.status, EventStatus::Cancelled | EventStatus::Completed) {
            return Err(AppError::BusinessRule(format!(
                "Event {} is {} and no longer sells tickets",
                event.title, event.status
            )));
        }
        let user = users::Entity::find_by_id(req.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

        let subtotal = ticket
            .price
            .checked_mul(req.quantity)
            .ok_or_else(|| AppError::ValidationError("Order amount is too large".into()))?;

        let redemption = match req.promo_code.as_deref().map(normalize_code) {
            Some(code) if !code.is_empty() => {
                Some(redeem(&txn, &code, &event, user.id, subtotal, now).await?)
            }
            _ => None,
        };
        let discount = redemption.as_ref().map_or(0, |r| r.discount);

        let sold = ticket_types::Entity::update_many()
            .col_expr(
                ticket_types::Column::QuantitySold,
                Expr::col(ticket_types::Column::QuantitySold).add(req.quantity),
            )
            .col_expr(ticket_types::Column::UpdatedAt, Expr::value(now))
            .filter(ticket_types::Column::Id.eq(ticket.id))
            .filter(
                Expr::col(ticket_types::Column::QuantitySold)
                    .lte(Expr::col(ticket_types::Column::Quantity).sub(req.quantity)),
            )
            .exec(&txn)
            .await?;
        if sold.rows_affected == 0 {
            return Err(AppError::BusinessRule(format!(
                "Only {} tickets of {} are left",
                ticket.remaining(),
                ticket.name
            )));
        }

        let order = orders::ActiveModel {
            order_number: Set(generate_order_number()),
            user_id: Set(user.id),
            event_id: Set(Some(event.id)),
            ticket_type_id: Set(Some(ticket.id)),
            quantity: Set(req.quantity),
            subtotal: Set(subtotal),
            discount_amount: Set(discount),
            total: Set(subtotal - discount),
            promo_code_id: Set(redemption.as_ref().map(|r| r.promo_code_id)),
            status: Set(OrderStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(r) = &redemption {
            usages::ActiveModel {
                promo_code_id: Set(r.promo_code_id),
                user_id: Set(user.id),
                order_id: Set(order.id),
                discount_amount: Set(r.discount),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        let description = match &redemption {
            Some(r) => format!(
                "Placed order {} for {} x {} with code {}",
                order.order_number, order.quantity, ticket.name, r.code
            ),
            None => format!(
                "Placed order {} for {} x {}",
                order.order_number, order.quantity, ticket.name
            ),
        };
        self.activity
            .record(actor, "order.placed", "order", order.id, description)
            .await;
        Ok(order.into())
    }

    /// `pending -> paid | cancelled`, `paid -> refunded`. Cancelling or
    /// refunding gives the tickets back to the ticket type.
    pub async fn update_status(
        &self,
        actor: i64,
        id: i64,
        status: OrderStatus,
    ) -> AppResult<OrderResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let order = orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
        if !order.status.can_transition_to(status) {
            return Err(AppError::BusinessRule(format!(
                "Order cannot move from {} to {}",
                order.status, status
            )));
        }

        let changed = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(status))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::Status.eq(order.status))
            .exec(&txn)
            .await?;
        if changed.rows_affected == 0 {
            return Err(AppError::BusinessRule(
                "Order was changed by someone else, reload and retry".into(),
            ));
        }

        if status.releases_tickets()
            && let Some(ticket_type_id) = order.ticket_type_id
        {
            ticket_types::Entity::update_many()
                .col_expr(
                    ticket_types::Column::QuantitySold,
                    Expr::col(ticket_types::Column::QuantitySold).sub(order.quantity),
                )
                .col_expr(ticket_types::Column::UpdatedAt, Expr::value(now))
                .filter(ticket_types::Column::Id.eq(ticket_type_id))
                .filter(ticket_types::Column::QuantitySold.gte(order.quantity))
                .exec(&txn)
                .await?;
        }

        let updated = orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
        txn.commit().await?;

        self.activity
            .record(
                actor,
                "order.status_changed",
                "order",
                id,
                format!(
                    "Order {} moved from {} to {}",
                    updated.order_number, order.status, status
                ),
            )
            .await;
        Ok(updated.into())
    }
}

/// Promo lookup holding the row until the transaction ends (`FOR UPDATE` on
/// Postgres); concurrent redemptions of one code run the per-user check in turn.
/// SQLite has no row locks and relies on its single writer.
fn locked_promo(code: &str) -> Select<promo_codes::Entity> {
    promo_codes::Entity::find()
        .filter(promo_codes::Column::Code.eq(code))
        .lock_exclusive()
}

async fn redeem(
    txn: &DatabaseTransaction,
    code: &str,
    event: &events::Model,
    user_id: i64,
    subtotal: i64,
    now: chrono::DateTime<Utc>,
) -> AppResult<Redemption> {
    let promo = locked_promo(code)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promo code {code} not found")))?;

    if !promo.is_valid(now) {
        return Err(AppError::BusinessRule(format!(
            "Promo code {code} is not valid"
        )));
    }
    let (event_ids, category_ids) = load_links(txn, promo.id).await?;
    if !promo.applies_to(event.id, event.category_id, &event_ids, &category_ids) {
        return Err(AppError::BusinessRule(format!(
            "Promo code {code} does not apply to {}",
            event.title
        )));
    }
    if !promo.meets_minimum(subtotal) {
        return Err(AppError::BusinessRule(format!(
            "Promo code {code} requires a larger order"
        )));
    }

    let prior = usages::Entity::find()
        .filter(usages::Column::PromoCodeId.eq(promo.id))
        .filter(usages::Column::UserId.eq(user_id))
        .count(txn)
        .await?;
    if prior >= promo.max_uses_per_user.max(0) as u64 {
        return Err(AppError::BusinessRule(format!(
            "Promo code {code} was already used the maximum number of times"
        )));
    }

    let claimed = promo_codes::Entity::update_many()
        .col_expr(
            promo_codes::Column::CurrentUses,
            Expr::col(promo_codes::Column::CurrentUses).add(1),
        )
        .col_expr(promo_codes::Column::UpdatedAt, Expr::value(now))
        .filter(promo_codes::Column::Id.eq(promo.id))
        .filter(
            Condition::any()
                .add(promo_codes::Column::MaxUses.is_null())
                .add(
                    Expr::col(promo_codes::Column::CurrentUses)
                        .lt(Expr::col(promo_codes::Column::MaxUses)),
                ),
        )
        .exec(txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(AppError::BusinessRule(format!(
            "Promo code {code} has reached its usage limit"
        )));
    }

    Ok(Redemption {
        promo_code_id: promo.id,
        code: promo.code.clone(),
        discount: promo.calculate_discount(subtotal, now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_user, setup_db};
    use crate::entities::{ApplicableTo, DiscountType};
    use crate::models::{EventRequest, TicketTypeRequest};
    use crate::services::promo_code_service::tests::promo_request;
    use crate::services::{EventService, PromoCodeService, TicketTypeService};
    use chrono::Duration;

    struct Fixture {
        orders: OrderService,
        promos: PromoCodeService,
        tickets: TicketTypeService,
        pool: DatabaseConnection,
        user_id: i64,
        event_id: i64,
        ticket_id: i64,
    }

    /// One event with a 50.00 ticket type holding `quantity` seats.
    async fn fixture(quantity: i64) -> Fixture {
        let pool = setup_db().await;
        let user_id = seed_user(&pool, "Buyer", "buyer@eventhub.io").await;
        let activity = ActivityLogService::new(pool.clone());
        let events = EventService::new(pool.clone(), activity.clone());
        let tickets = TicketTypeService::new(pool.clone(), events.clone(), activity.clone());

        let starts_at = Utc::now() + Duration::days(7);
        let event = events
            .create(
                user_id,
                EventRequest {
                    title: "Summer Gala".into(),
                    slug: None,
                    description: None,
                    category_id: None,
                    venue_id: None,
                    starts_at,
                    ends_at: starts_at + Duration::hours(4),
                    status: Some(EventStatus::Published),
                },
            )
            .await
            .unwrap();
        let ticket = tickets
            .create(
                user_id,
                event.id,
                TicketTypeRequest {
                    name: "General".into(),
                    price: 5000,
                    quantity,
                },
            )
            .await
            .unwrap();

        Fixture {
            orders: OrderService::new(pool.clone(), activity.clone()),
            promos: PromoCodeService::new(pool.clone(), activity),
            tickets,
            pool,
            user_id,
            event_id: event.id,
            ticket_id: ticket.id,
        }
    }

    fn order(f: &Fixture, quantity: i64, code: Option<&str>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            user_id: f.user_id,
            ticket_type_id: f.ticket_id,
            quantity,
            promo_code: code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_fixed_code_discount_and_usage() {
        let f = fixture(10).await;
        f.promos
            .create(f.user_id, promo_request("TENOFF", DiscountType::Fixed, 1000))
            .await
            .unwrap();

        let placed = f
            .orders
            .place_order(f.user_id, order(&f, 2, Some("tenoff")))
            .await
            .unwrap();
        assert_eq!(placed.subtotal, 10_000);
        assert_eq!(placed.discount_amount, 1000);
        assert_eq!(placed.total, 9000);
        assert_eq!(placed.status, OrderStatus::Pending);

        let usage_count = usages::Entity::find().count(&f.pool).await.unwrap();
        assert_eq!(usage_count, 1);
        let tt = f.tickets.get(f.ticket_id).await.unwrap();
        assert_eq!(tt.quantity_sold, 2);
    }

    #[tokio::test]
    async fn test_global_cap_is_enforced() {
        let f = fixture(10).await;
        let other = seed_user(&f.pool, "Other", "other@eventhub.io").await;
        let mut req = promo_request("ONLYONE", DiscountType::Percentage, 1000);
        req.max_uses = Some(1);
        f.promos.create(f.user_id, req).await.unwrap();

        f.orders
            .place_order(f.user_id, order(&f, 1, Some("ONLYONE")))
            .await
            .unwrap();

        let mut second = order(&f, 1, Some("ONLYONE"));
        second.user_id = other;
        let err = f.orders.place_order(f.user_id, second).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        // The failed attempt must not sell tickets
        let tt = f.tickets.get(f.ticket_id).await.unwrap();
        assert_eq!(tt.quantity_sold, 1);
    }

    #[tokio::test]
    async fn test_per_user_cap_is_enforced() {
        let f = fixture(10).await;
        let mut req = promo_request("TWICE", DiscountType::Fixed, 100);
        req.max_uses_per_user = Some(2);
        f.promos.create(f.user_id, req).await.unwrap();

        for _ in 0..2 {
            f.orders
                .place_order(f.user_id, order(&f, 1, Some("TWICE")))
                .await
                .unwrap();
        }
        assert!(matches!(
            f.orders.place_order(f.user_id, order(&f, 1, Some("TWICE"))).await,
            Err(AppError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_promo_row_is_locked_for_redemption() {
        use sea_orm::QueryTrait;
        let sql = locked_promo("SPRING")
            .build(sea_orm::DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("FOR UPDATE"), "{sql}");
    }

    #[tokio::test]
    async fn test_code_restrictions() {
        let f = fixture(10).await;

        let mut elsewhere = promo_request("ELSEWHERE", DiscountType::Fixed, 100);
        elsewhere.applicable_to = Some(ApplicableTo::SpecificEvents);
        elsewhere.event_ids = vec![f.event_id];
        f.promos.create(f.user_id, elsewhere).await.unwrap();
        assert!(
            f.orders
                .place_order(f.user_id, order(&f, 1, Some("ELSEWHERE")))
                .await
                .is_ok()
        );

        let mut big = promo_request("BIGSPEND", DiscountType::Fixed, 100);
        big.min_order_amount = Some(20_000);
        f.promos.create(f.user_id, big).await.unwrap();
        assert!(matches!(
            f.orders.place_order(f.user_id, order(&f, 1, Some("BIGSPEND"))).await,
            Err(AppError::BusinessRule(_))
        ));

        let mut expired = promo_request("OLD", DiscountType::Fixed, 100);
        expired.valid_from = Utc::now() - Duration::days(10);
        expired.valid_until = Utc::now() - Duration::days(1);
        f.promos.create(f.user_id, expired).await.unwrap();
        assert!(matches!(
            f.orders.place_order(f.user_id, order(&f, 1, Some("OLD"))).await,
            Err(AppError::BusinessRule(_))
        ));

        assert!(matches!(
            f.orders.place_order(f.user_id, order(&f, 1, Some("NOPE"))).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_free_ticket_code() {
        let f = fixture(5).await;
        f.promos
            .create(f.user_id, promo_request("VIP", DiscountType::FreeTicket, 0))
            .await
            .unwrap();
        let placed = f
            .orders
            .place_order(f.user_id, order(&f, 3, Some("VIP")))
            .await
            .unwrap();
        assert_eq!(placed.discount_amount, placed.subtotal);
        assert_eq!(placed.total, 0);
    }

    #[tokio::test]
    async fn test_sold_out_is_rejected() {
        let f = fixture(3).await;
        f.orders
            .place_order(f.user_id, order(&f, 2, None))
            .await
            .unwrap();
        assert!(matches!(
            f.orders.place_order(f.user_id, order(&f, 2, None)).await,
            Err(AppError::BusinessRule(_))
        ));
        assert!(
            f.orders
                .place_order(f.user_id, order(&f, 1, None))
                .await
                .is_ok()
        );
        assert!(matches!(
            f.orders.place_order(f.user_id, order(&f, 0, None)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_status_transitions_release_tickets() {
        let f = fixture(10).await;
        let placed = f
            .orders
            .place_order(f.user_id, order(&f, 4, None))
            .await
            .unwrap();

        // ticket type with sales cannot be removed or shrunk below sales
        assert!(matches!(
            f.tickets.delete(f.user_id, f.ticket_id).await,
            Err(AppError::BusinessRule(_))
        ));
        assert!(matches!(
            f.tickets
                .update(
                    f.user_id,
                    f.ticket_id,
                    TicketTypeRequest {
                        name: "General".into(),
                        price: 5000,
                        quantity: 3,
                    },
                )
                .await,
            Err(AppError::BusinessRule(_))
        ));

        assert!(matches!(
            f.orders
                .update_status(f.user_id, placed.id, OrderStatus::Refunded)
                .await,
            Err(AppError::BusinessRule(_))
        ));

        let paid = f
            .orders
            .update_status(f.user_id, placed.id, OrderStatus::Paid)
            .await
            .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);

        let refunded = f
            .orders
            .update_status(f.user_id, placed.id, OrderStatus::Refunded)
            .await
            .unwrap();
        assert_eq!(refunded.status, OrderStatus::Refunded);
        assert_eq!(f.tickets.get(f.ticket_id).await.unwrap().quantity_sold, 0);

        assert!(matches!(
            f.orders
                .update_status(f.user_id, placed.id, OrderStatus::Paid)
                .await,
            Err(AppError::BusinessRule(_))
        ));
        f.tickets.delete(f.user_id, f.ticket_id).await.unwrap();
    }
}
