use super::current_user_id;
use crate::models::*;
use crate::services::VenueService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/venues",
    tag = "venues",
    params(
        ("search" = Option<String>, Query, description = "Matches name or city"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active venues")
    )
)]
pub async fn list_venues(
    venue_service: web::Data<VenueService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match venue_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = i64, Path, description = "Venue id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The venue", body = VenueResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_venue(
    venue_service: web::Data<VenueService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match venue_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/venues",
    tag = "venues",
    request_body = VenueRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Venue created", body = VenueResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_venue(
    venue_service: web::Data<VenueService>,
    req: HttpRequest,
    request: web::Json<VenueRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match venue_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = i64, Path, description = "Venue id")),
    request_body = VenueRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Venue updated", body = VenueResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_venue(
    venue_service: web::Data<VenueService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<VenueRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match venue_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/venues/{id}",
    tag = "venues",
    params(("id" = i64, Path, description = "Venue id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Venue moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed"),
        (status = 409, description = "Active events still use the venue")
    )
)]
pub async fn delete_venue(
    venue_service: web::Data<VenueService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match venue_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Venue moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn venue_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/venues")
            .route("", web::get().to(list_venues))
            .route("", web::post().to(create_venue))
            .route("/{id}", web::get().to(get_venue))
            .route("/{id}", web::put().to(update_venue))
            .route("/{id}", web::delete().to(delete_venue)),
    );
}
