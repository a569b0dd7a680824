use super::current_user_id;
use crate::entities::EventStatus;
use crate::models::*;
use crate::services::{EventService, TicketTypeService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(
        ("search" = Option<String>, Query, description = "Matches title or slug"),
        ("category_id" = Option<i64>, Query, description = "Only events in this category"),
        ("venue_id" = Option<i64>, Query, description = "Only events at this venue"),
        ("status" = Option<EventStatus>, Query, description = "draft, published, cancelled or completed"),
        ("sort_by" = Option<EventSortBy>, Query, description = "starts_at, title or created_at"),
        ("sort_dir" = Option<SortDir>, Query, description = "asc or desc"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active events")
    )
)]
pub async fn list_events(
    event_service: web::Data<EventService>,
    query: web::Query<EventQuery>,
) -> Result<HttpResponse> {
    match event_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The event", body = EventResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_event(event_service: web::Data<EventService>, id: web::Path<i64>) -> Result<HttpResponse> {
    match event_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = EventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    request: web::Json<EventRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match event_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<EventRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match event_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match event_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Event moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{id}/ticket-types",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket types of the event", body = [TicketTypeResponse]),
        (status = 404, description = "Event not found")
    )
)]
pub async fn list_ticket_types(
    ticket_type_service: web::Data<TicketTypeService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match ticket_type_service.list_for_event(id.into_inner()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{id}/ticket-types",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = TicketTypeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Ticket type created", body = TicketTypeResponse),
        (status = 404, description = "Event not found")
    )
)]
pub async fn create_ticket_type(
    ticket_type_service: web::Data<TicketTypeService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<TicketTypeRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match ticket_type_service
        .create(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/ticket-types/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Ticket type id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The ticket type", body = TicketTypeResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_ticket_type(
    ticket_type_service: web::Data<TicketTypeService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match ticket_type_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/ticket-types/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Ticket type id")),
    request_body = TicketTypeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket type updated", body = TicketTypeResponse),
        (status = 409, description = "Quantity below the tickets already sold")
    )
)]
pub async fn update_ticket_type(
    ticket_type_service: web::Data<TicketTypeService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<TicketTypeRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match ticket_type_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/ticket-types/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Ticket type id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket type deleted", body = IdResponse),
        (status = 409, description = "Tickets of this type were already sold")
    )
)]
pub async fn delete_ticket_type(
    ticket_type_service: web::Data<TicketTypeService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match ticket_type_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Ticket type deleted",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(list_events))
            .route("", web::post().to(create_event))
            .route("/{id}", web::get().to(get_event))
            .route("/{id}", web::put().to(update_event))
            .route("/{id}", web::delete().to(delete_event))
            .route("/{id}/ticket-types", web::get().to(list_ticket_types))
            .route("/{id}/ticket-types", web::post().to(create_ticket_type)),
    );
}

pub fn ticket_type_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ticket-types")
            .route("/{id}", web::get().to(get_ticket_type))
            .route("/{id}", web::put().to(update_ticket_type))
            .route("/{id}", web::delete().to(delete_ticket_type)),
    );
}
