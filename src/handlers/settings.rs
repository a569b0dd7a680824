use super::current_user_id;
use crate::models::*;
use crate::services::{AssistantService, BackupService, MailSettingsService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/settings/mail",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Mail settings with the API key masked", body = MailSettingsResponse)
    )
)]
pub async fn get_mail_settings(
    mail_service: web::Data<MailSettingsService>,
) -> Result<HttpResponse> {
    match mail_service.get().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(settings))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/settings/mail",
    tag = "settings",
    request_body = MailSettingsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Settings saved", body = MailSettingsResponse),
        (status = 400, description = "Invalid URL or sender address")
    )
)]
pub async fn update_mail_settings(
    mail_service: web::Data<MailSettingsService>,
    req: HttpRequest,
    request: web::Json<MailSettingsRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match mail_service.update(actor, request.into_inner()).await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(settings))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/settings/mail/test",
    tag = "settings",
    request_body = TestMailRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Test mail sent"),
        (status = 502, description = "Delivery failed")
    )
)]
pub async fn send_test_mail(
    mail_service: web::Data<MailSettingsService>,
    req: HttpRequest,
    request: web::Json<TestMailRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match mail_service.send_test(actor, request.to.trim()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Test mail sent"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/backups",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Backup files, newest first", body = [BackupFile])
    )
)]
pub async fn list_backups(backup_service: web::Data<BackupService>) -> Result<HttpResponse> {
    match backup_service.list().await {
        Ok(files) => Ok(HttpResponse::Ok().json(ApiResponse::success(files))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/backups",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Backup created", body = BackupFile),
        (status = 500, description = "The dump failed")
    )
)]
pub async fn create_backup(
    backup_service: web::Data<BackupService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match backup_service.create(actor).await {
        Ok(file) => Ok(HttpResponse::Created().json(ApiResponse::success(file))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/backups/{name}",
    tag = "settings",
    params(("name" = String, Path, description = "Backup file name")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Backup deleted"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "No such backup")
    )
)]
pub async fn delete_backup(
    backup_service: web::Data<BackupService>,
    req: HttpRequest,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match backup_service.delete(actor, &name).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Backup deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/assistant/ask",
    tag = "settings",
    request_body = AssistantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assistant reply", body = AssistantResponse),
        (status = 409, description = "The assistant is not configured"),
        (status = 502, description = "The assistant is unavailable")
    )
)]
pub async fn ask_assistant(
    assistant_service: web::Data<AssistantService>,
    req: HttpRequest,
    request: web::Json<AssistantRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match assistant_service.ask(user_id, request.into_inner()).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(ApiResponse::success(reply))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("/mail", web::get().to(get_mail_settings))
            .route("/mail", web::put().to(update_mail_settings))
            .route("/mail/test", web::post().to(send_test_mail)),
    )
    .service(
        web::scope("/backups")
            .route("", web::get().to(list_backups))
            .route("", web::post().to(create_backup))
            .route("/{name}", web::delete().to(delete_backup)),
    )
    .route("/assistant/ask", web::post().to(ask_assistant));
}
