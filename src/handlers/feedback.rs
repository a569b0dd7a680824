use super::current_user_id;
use crate::models::*;
use crate::services::{ReviewService, SurveyService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/surveys",
    tag = "feedback",
    params(
        ("search" = Option<String>, Query, description = "Matches title"),
        ("event_id" = Option<i64>, Query, description = "Only surveys of this event"),
        ("is_active" = Option<bool>, Query, description = "Filter by the active flag"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active surveys")
    )
)]
pub async fn list_surveys(
    survey_service: web::Data<SurveyService>,
    query: web::Query<SurveyQuery>,
) -> Result<HttpResponse> {
    match survey_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/surveys/{id}",
    tag = "feedback",
    params(("id" = i64, Path, description = "Survey id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The survey", body = SurveyResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_survey(
    survey_service: web::Data<SurveyService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match survey_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/surveys",
    tag = "feedback",
    request_body = SurveyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Survey created", body = SurveyResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_survey(
    survey_service: web::Data<SurveyService>,
    req: HttpRequest,
    request: web::Json<SurveyRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match survey_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/surveys/{id}",
    tag = "feedback",
    params(("id" = i64, Path, description = "Survey id")),
    request_body = SurveyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Survey updated", body = SurveyResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_survey(
    survey_service: web::Data<SurveyService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<SurveyRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match survey_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/surveys/{id}",
    tag = "feedback",
    params(("id" = i64, Path, description = "Survey id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Survey moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_survey(
    survey_service: web::Data<SurveyService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match survey_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Survey moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "feedback",
    params(
        ("search" = Option<String>, Query, description = "Matches reviewer name or comment"),
        ("event_id" = Option<i64>, Query, description = "Only reviews of this event"),
        ("rating" = Option<i32>, Query, description = "Exact star rating, 1 to 5"),
        ("is_published" = Option<bool>, Query, description = "Filter by the published flag"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active reviews")
    )
)]
pub async fn list_reviews(
    review_service: web::Data<ReviewService>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse> {
    match review_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "feedback",
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The review", body = ReviewResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_review(
    review_service: web::Data<ReviewService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match review_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "feedback",
    request_body = ReviewRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    request: web::Json<ReviewRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match review_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "feedback",
    params(("id" = i64, Path, description = "Review id")),
    request_body = ReviewRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<ReviewRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match review_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "feedback",
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match review_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Review moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn survey_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/surveys")
            .route("", web::get().to(list_surveys))
            .route("", web::post().to(create_survey))
            .route("/{id}", web::get().to(get_survey))
            .route("/{id}", web::put().to(update_survey))
            .route("/{id}", web::delete().to(delete_survey)),
    );
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(list_reviews))
            .route("", web::post().to(create_review))
            .route("/{id}", web::get().to(get_review))
            .route("/{id}", web::put().to(update_review))
            .route("/{id}", web::delete().to(delete_review)),
    );
}
