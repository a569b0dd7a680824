use super::current_user_id;
use crate::models::*;
use crate::services::TeamService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    params(
        ("search" = Option<String>, Query, description = "Matches name"),
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active teams")
    )
)]
pub async fn list_teams(
    team_service: web::Data<TeamService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match team_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The team", body = TeamResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn get_team(
    team_service: web::Data<TeamService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match team_service.get(id.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = TeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_team(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    request: web::Json<TeamRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match team_service.create(actor, request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    request_body = TeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Team updated", body = TeamResponse),
        (status = 404, description = "Not found or in the recycle bin")
    )
)]
pub async fn update_team(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<TeamRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match team_service
        .update(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Team moved to the recycle bin", body = IdResponse),
        (status = 404, description = "Not found or already trashed"),
        (status = 409, description = "The team still has members")
    )
)]
pub async fn delete_team(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let id = id.into_inner();
    match team_service.delete(actor, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            IdResponse { id },
            "Team moved to the recycle bin",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/teams/{id}/members",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Team members", body = [TeamMemberResponse]),
        (status = 404, description = "Team not found")
    )
)]
pub async fn list_team_members(
    team_service: web::Data<TeamService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    match team_service.list_members(id.into_inner()).await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(members))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/teams/{id}/members",
    tag = "teams",
    params(("id" = i64, Path, description = "Team id")),
    request_body = AddTeamMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Member added", body = TeamMemberResponse),
        (status = 409, description = "Already a member")
    )
)]
pub async fn add_team_member(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<AddTeamMemberRequest>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    match team_service
        .add_member(actor, id.into_inner(), request.into_inner())
        .await
    {
        Ok(member) => Ok(HttpResponse::Created().json(ApiResponse::success(member))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/teams/{id}/members/{user_id}",
    tag = "teams",
    params(
        ("id" = i64, Path, description = "Team id"),
        ("user_id" = i64, Path, description = "Member user id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member removed"),
        (status = 404, description = "Not a member")
    )
)]
pub async fn remove_team_member(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let actor = current_user_id(&req)?;
    let (team_id, user_id) = path.into_inner();
    match team_service.remove_member(actor, team_id, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Member removed"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn team_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .route("", web::get().to(list_teams))
            .route("", web::post().to(create_team))
            .route("/{id}", web::get().to(get_team))
            .route("/{id}", web::put().to(update_team))
            .route("/{id}", web::delete().to(delete_team))
            .route("/{id}/members", web::get().to(list_team_members))
            .route("/{id}/members", web::post().to(add_team_member))
            .route("/{id}/members/{user_id}", web::delete().to(remove_team_member)),
    );
}
