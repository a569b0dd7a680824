use super::current_user_id;
use crate::models::*;
use crate::services::CategoryService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(
        ("search" = Option<String>, Query, description = "Matches name or slug"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active categorys")
    )
)]
pub async fn list_categories(
    category_service: web::Data<CategoryService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match category_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The category", body = CategoryResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_category(
    category_service: web::Data<CategoryService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match category_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_category(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
    request: web::Json<CategoryRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match category_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_category(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<CategoryRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match category_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed"),
        (status = 409, description = "The category still has active child categories")
    )
)]
pub async fn delete_category(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match category_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Category moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn category_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category)),
    );
}
