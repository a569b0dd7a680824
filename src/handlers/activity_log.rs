use crate::models::*;
use crate::services::ActivityLogService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/activity-logs",
    tag = "activity-logs",
    params(
        ("user_id" = Option<i64>, Query, description = "Only entries by this user"),
        ("action" = Option<String>, Query, description = "Exact action, e.g. category.deleted"),
        ("subject_type" = Option<String>, Query, description = "Exact subject type, e.g. category"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Activity log entries, newest first")
    )
)]
pub async fn list_activity_logs(
    activity_service: web::Data<ActivityLogService>,
    query: web::Query<ActivityLogQuery>,
) -> Result<HttpResponse> {
    match activity_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn activity_log_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/activity-logs", web::get().to(list_activity_logs));
}
