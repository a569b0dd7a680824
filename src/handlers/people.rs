use super::current_user_id;
use crate::models::*;
use crate::services::{SpeakerService, SponsorService, VendorService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/speakers",
    tag = "people",
    params(
        ("search" = Option<String>, Query, description = "Matches name or company"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active speakers")
    )
)]
pub async fn list_speakers(
    speaker_service: web::Data<SpeakerService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match speaker_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/speakers/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Speaker id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The speaker", body = SpeakerResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_speaker(
    speaker_service: web::Data<SpeakerService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match speaker_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/speakers",
    tag = "people",
    request_body = SpeakerRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Speaker created", body = SpeakerResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_speaker(
    speaker_service: web::Data<SpeakerService>,
    req: HttpRequest,
    request: web::Json<SpeakerRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match speaker_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/speakers/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Speaker id")),
    request_body = SpeakerRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Speaker updated", body = SpeakerResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_speaker(
    speaker_service: web::Data<SpeakerService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<SpeakerRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match speaker_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/speakers/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Speaker id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Speaker moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_speaker(
    speaker_service: web::Data<SpeakerService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match speaker_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Speaker moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/sponsors",
    tag = "people",
    params(
        ("search" = Option<String>, Query, description = "Matches name"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active sponsors")
    )
)]
pub async fn list_sponsors(
    sponsor_service: web::Data<SponsorService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match sponsor_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/sponsors/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Sponsor id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The sponsor", body = SponsorResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_sponsor(
    sponsor_service: web::Data<SponsorService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match sponsor_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/sponsors",
    tag = "people",
    request_body = SponsorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Sponsor created", body = SponsorResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_sponsor(
    sponsor_service: web::Data<SponsorService>,
    req: HttpRequest,
    request: web::Json<SponsorRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match sponsor_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/sponsors/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Sponsor id")),
    request_body = SponsorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sponsor updated", body = SponsorResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_sponsor(
    sponsor_service: web::Data<SponsorService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<SponsorRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match sponsor_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/sponsors/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Sponsor id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sponsor moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_sponsor(
    sponsor_service: web::Data<SponsorService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match sponsor_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Sponsor moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/vendors",
    tag = "people",
    params(
        ("search" = Option<String>, Query, description = "Matches name or service type"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active vendors")
    )
)]
pub async fn list_vendors(
    vendor_service: web::Data<VendorService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match vendor_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/vendors/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Vendor id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The vendor", body = VendorResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_vendor(
    vendor_service: web::Data<VendorService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match vendor_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/vendors",
    tag = "people",
    request_body = VendorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Vendor created", body = VendorResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_vendor(
    vendor_service: web::Data<VendorService>,
    req: HttpRequest,
    request: web::Json<VendorRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match vendor_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/vendors/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Vendor id")),
    request_body = VendorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vendor updated", body = VendorResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_vendor(
    vendor_service: web::Data<VendorService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<VendorRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match vendor_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/vendors/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Vendor id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vendor moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed")
    )
)]
pub async fn delete_vendor(
    vendor_service: web::Data<VendorService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match vendor_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Vendor moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn speaker_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/speakers")
            .route("", web::get().to(list_speakers))
            .route("", web::post().to(create_speaker))
            .route("/{id}", web::get().to(get_speaker))
            .route("/{id}", web::put().to(update_speaker))
            .route("/{id}", web::delete().to(delete_speaker)),
    );
}

pub fn sponsor_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sponsors")
            .route("", web::get().to(list_sponsors))
            .route("", web::post().to(create_sponsor))
            .route("/{id}", web::get().to(get_sponsor))
            .route("/{id}", web::put().to(update_sponsor))
            .route("/{id}", web::delete().to(delete_sponsor)),
    );
}

pub fn vendor_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vendors")
            .route("", web::get().to(list_vendors))
            .route("", web::post().to(create_vendor))
            .route("/{id}", web::get().to(get_vendor))
            .route("/{id}", web::put().to(update_vendor))
            .route("/{id}", web::delete().to(delete_vendor)),
    );
}
