use super::current_user_id;
use crate::entities::SocialProvider;
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = LoginResponse),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    match auth_service.refresh_token(&request.refresh_token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match auth_service.me(user_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/password/otp",
    tag = "auth",
    request_body = PasswordOtpRequest,
    responses(
        (status = 200, description = "A code was sent if the address is registered")
    )
)]
pub async fn request_password_otp(
    auth_service: web::Data<AuthService>,
    request: web::Json<PasswordOtpRequest>,
) -> Result<HttpResponse> {
    match auth_service.request_password_reset(&request.email).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
            "If the address is registered, a reset code has been sent",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/password/reset",
    tag = "auth",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn reset_password(
    auth_service: web::Data<AuthService>,
    request: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse> {
    match auth_service.reset_password(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Password changed"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/social",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Linked social accounts", body = [SocialAccountResponse])
    )
)]
pub async fn list_social_accounts(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match auth_service.list_social_accounts(user_id).await {
        Ok(accounts) => Ok(HttpResponse::Ok().json(ApiResponse::success(accounts))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/social",
    tag = "auth",
    request_body = LinkSocialAccountRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account linked", body = SocialAccountResponse),
        (status = 409, description = "Already linked elsewhere")
    )
)]
pub async fn link_social_account(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<LinkSocialAccountRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match auth_service
        .link_social_account(user_id, request.into_inner())
        .await
    {
        Ok(account) => Ok(HttpResponse::Ok().json(ApiResponse::success(account))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/auth/social/{provider}",
    tag = "auth",
    params(("provider" = SocialProvider, Path, description = "google, facebook or github")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account unlinked"),
        (status = 404, description = "Nothing linked for this provider")
    )
)]
pub async fn unlink_social_account(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    provider: web::Path<SocialProvider>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match auth_service
        .unlink_social_account(user_id, provider.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Account unlinked"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/social/login",
    tag = "auth",
    request_body = SocialLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "No user linked to this account")
    )
)]
pub async fn social_login(
    auth_service: web::Data<AuthService>,
    request: web::Json<SocialLoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.social_login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/me", web::get().to(me))
            .route("/password/otp", web::post().to(request_password_otp))
            .route("/password/reset", web::post().to(reset_password))
            .route("/social", web::get().to(list_social_accounts))
            .route("/social", web::post().to(link_social_account))
            .route("/social/login", web::post().to(social_login))
            .route("/social/{provider}", web::delete().to(unlink_social_account)),
    );
}
