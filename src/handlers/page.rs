use super::current_user_id;
use crate::models::*;
use crate::services::PageService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/pages",
    tag = "pages",
    params(
        ("search" = Option<String>, Query, description = "Matches title or slug"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active pages")
    )
)]
pub async fn list_pages(
    page_service: web::Data<PageService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match page_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/pages/{id}",
    tag = "pages",
    params(("id" = i64, Path, description = "Page id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The page", body = PageResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_page(
    page_service: web::Data<PageService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match page_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/pages",
    tag = "pages",
    request_body = PageRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Page created", body = PageResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_page(
    page_service: web::Data<PageService>,
    req: HttpRequest,
    request: web::Json<PageRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match page_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/pages/{id}",
    tag = "pages",
    params(("id" = i64, Path, description = "Page id")),
    request_body = PageRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page updated", body = PageResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_page(
    page_service: web::Data<PageService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<PageRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match page_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/pages/{id}",
    tag = "pages",
    params(("id" = i64, Path, description = "Page id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_page(
    page_service: web::Data<PageService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match page_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Page moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn page_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pages")
            .route("", web::get().to(list_pages))
            .route("", web::post().to(create_page))
            .route("/{id}", web::get().to(get_page))
            .route("/{id}", web::put().to(update_page))
            .route("/{id}", web::delete().to(delete_page)),
    );
}
