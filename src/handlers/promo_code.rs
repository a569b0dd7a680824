use super::current_user_id;
use crate::models::*;
use crate::services::PromoCodeService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/promo-codes",
    tag = "promo-codes",
    params(
        ("search" = Option<String>, Query, description = "Matches code or description"),
        ("is_active" = Option<bool>, Query, description = "Filter on the active flag"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Promo codes")
    )
)]
pub async fn list_promo_codes(
    promo_code_service: web::Data<PromoCodeService>,
    query: web::Query<PromoCodeQuery>,
) -> Result<HttpResponse> {
    match promo_code_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/promo-codes/{id}",
    tag = "promo-codes",
    params(("id" = i64, Path, description = "Promo code id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The promo code", body = PromoCodeResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_promo_code(promo_code_service: web::Data<PromoCodeService>, id: web::Path<i64>) -> Result<HttpResponse> {
    match promo_code_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/promo-codes",
    tag = "promo-codes",
    request_body = PromoCodeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Promo code created", body = PromoCodeResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_promo_code(
    promo_code_service: web::Data<PromoCodeService>,
    req: HttpRequest,
    request: web::Json<PromoCodeRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match promo_code_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/promo-codes/{id}",
    tag = "promo-codes",
    params(("id" = i64, Path, description = "Promo code id")),
    request_body = PromoCodeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Promo code updated", body = PromoCodeResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_promo_code(
    promo_code_service: web::Data<PromoCodeService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<PromoCodeRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match promo_code_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/promo-codes/{id}",
    tag = "promo-codes",
    params(("id" = i64, Path, description = "Promo code id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Promo code deleted", body = IdResponse),
        (status = 404, description = "Not found"),
        (status = 409, description = "The code was already used")
    )
)]
pub async fn delete_promo_code(
    promo_code_service: web::Data<PromoCodeService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match promo_code_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Promo code deleted",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/promo-codes/check",
    tag = "promo-codes",
    request_body = CheckPromoCodeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Discount the code gives on the order", body = CheckPromoCodeResponse),
        (status = 404, description = "Unknown code"),
        (status = 409, description = "The code cannot be used for this order")
    )
)]
pub async fn check_promo_code(
    promo_code_service: web::Data<PromoCodeService>,
    request: web::Json<CheckPromoCodeRequest>,
) -> Result<HttpResponse> {
    match promo_code_service.check(request.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn promo_code_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/promo-codes")
            .route("", web::get().to(list_promo_codes))
            .route("", web::post().to(create_promo_code))
            .route("/check", web::post().to(check_promo_code))
            .route("/{id}", web::get().to(get_promo_code))
            .route("/{id}", web::put().to(update_promo_code))
            .route("/{id}", web::delete().to(delete_promo_code)),
    );
}
