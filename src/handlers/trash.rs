use super::current_user_id;
use crate::models::*;
use crate::services::TrashService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/recycle-bin",
    tag = "recycle-bin",
    params(
        ("type" = Option<String>, Query, description = "category, team, event, venue, sponsor, speaker, vendor, page or all"),
        ("search" = Option<String>, Query, description = "Matches the item label"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Trashed items, most recently deleted first"),
        (status = 404, description = "Unknown type")
    )
)]
pub async fn list_trash(
    trash_service: web::Data<TrashService>,
    query: web::Query<TrashQuery>,
) -> Result<HttpResponse> {
    match trash_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/recycle-bin/counts",
    tag = "recycle-bin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Trashed rows per type", body = TrashCountsResponse)
    )
)]
pub async fn trash_counts(trash_service: web::Data<TrashService>) -> Result<HttpResponse> {
    match trash_service.counts().await {
        Ok(counts) => Ok(HttpResponse::Ok().json(ApiResponse::success(counts))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/recycle-bin/{type}/{id}/restore",
    tag = "recycle-bin",
    params(
        ("type" = String, Path, description = "Item type"),
        ("id" = i64, Path, description = "Item id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item restored"),
        (status = 404, description = "Unknown type or no trashed item with this id")
    )
)]
pub async fn restore_item(
    trash_service: web::Data<TrashService>,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let (kind, id) = path.into_inner();
    match trash_service.restore(actor, &kind, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Item restored"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/recycle-bin/{type}/{id}",
    tag = "recycle-bin",
    params(
        ("type" = String, Path, description = "Item type"),
        ("id" = i64, Path, description = "Item id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item permanently deleted"),
        (status = 404, description = "Unknown type or no trashed item with this id")
    )
)]
pub async fn force_delete_item(
    trash_service: web::Data<TrashService>,
    req: HttpRequest,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let (kind, id) = path.into_inner();
    match trash_service.force_delete(actor, &kind, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
            "Item permanently deleted",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/recycle-bin/bulk-restore",
    tag = "recycle-bin",
    request_body = BulkTrashRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Restored items; unresolved ones are listed as skipped", body = BulkTrashResult)
    )
)]
pub async fn bulk_restore(
    trash_service: web::Data<TrashService>,
    req: HttpRequest,
    request: web::Json<BulkTrashRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match trash_service.bulk_restore(actor, &request.items).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/recycle-bin/bulk-delete",
    tag = "recycle-bin",
    request_body = BulkTrashRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted items; unresolved ones are listed as skipped", body = BulkTrashResult)
    )
)]
pub async fn bulk_force_delete(
    trash_service: web::Data<TrashService>,
    req: HttpRequest,
    request: web::Json<BulkTrashRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match trash_service.bulk_force_delete(actor, &request.items).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/recycle-bin",
    tag = "recycle-bin",
    params(
        ("type" = Option<String>, Query, description = "Only this type; all types when omitted")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of rows removed", body = EmptyTrashResponse),
        (status = 404, description = "Unknown type")
    )
)]
pub async fn empty_trash(
    trash_service: web::Data<TrashService>,
    req: HttpRequest,
    query: web::Query<EmptyTrashQuery>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match trash_service.empty(actor, query.kind.as_deref()).await {
        Ok(deleted) => Ok(HttpResponse::Ok().json(ApiResponse::success(EmptyTrashResponse {
            deleted,
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn trash_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recycle-bin")
            .route("", web::get().to(list_trash))
            .route("", web::delete().to(empty_trash))
            .route("/counts", web::get().to(trash_counts))
            .route("/bulk-restore", web::post().to(bulk_restore))
            .route("/bulk-delete", web::post().to(bulk_force_delete))
            .route("/{type}/{id}/restore", web::post().to(restore_item))
            .route("/{type}/{id}", web::delete().to(force_delete_item)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{seed_user, setup_db};
    use crate::entities::category_entity as categories;
    use crate::services::ActivityLogService;
    use actix_web::{App, HttpMessage, test};
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};

    #[actix_web::test]
    async fn test_restore_route_and_unknown_type() {
        let pool = setup_db().await;
        let actor = seed_user(&pool, "Admin", "admin@eventhub.io").await;
        let now = Utc::now();
        let trashed = categories::ActiveModel {
            name: Set("Meetups".into()),
            slug: Set("meetups".into()),
            description: Set(None),
            parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(Some(now)),
            deleted_by: Set(Some(actor)),
            ..Default::default()
        }
        .insert(&pool)
        .await
        .unwrap();

        let service = TrashService::new(pool.clone(), ActivityLogService::new(pool));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(actor);
                    actix_web::dev::Service::call(srv, req)
                })
                .configure(trash_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/recycle-bin/category/{}/restore", trashed.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        // now active again, a second restore finds nothing
        let req = test::TestRequest::post()
            .uri(&format!("/recycle-bin/category/{}/restore", trashed.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let req = test::TestRequest::delete()
            .uri("/recycle-bin/widget/1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
