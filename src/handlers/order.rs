use super::current_user_id;
use crate::entities::OrderStatus;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(
        ("search" = Option<String>, Query, description = "Matches the order number"),
        ("status" = Option<OrderStatus>, Query, description = "pending, paid, cancelled or refunded"),
        ("user_id" = Option<i64>, Query, description = "Only orders of this user"),
        ("event_id" = Option<i64>, Query, description = "Only orders for this event"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders, newest first")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    match order_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match order_service.get(id.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = PlaceOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 409, description = "Sold out or the promo code cannot be used")
    )
)]
pub async fn place_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match order_service.place_order(actor, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Created().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match order_service
        .update_status(actor, id.into_inner(), request.into_inner().status)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("", web::post().to(place_order))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/status", web::put().to(update_order_status)),
    );
}
