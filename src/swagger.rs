use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ApplicableTo, DiscountType, EventStatus, OrderStatus, SocialProvider, SponsorTier};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::auth::request_password_otp,
        handlers::auth::reset_password,
        handlers::auth::list_social_accounts,
        handlers::auth::link_social_account,
        handlers::auth::unlink_social_account,
        handlers::auth::social_login,
        handlers::category::list_categories,
        handlers::category::get_category,
        handlers::category::create_category,
        handlers::category::update_category,
        handlers::category::delete_category,
        handlers::team::list_teams,
        handlers::team::get_team,
        handlers::team::create_team,
        handlers::team::update_team,
        handlers::team::delete_team,
        handlers::team::list_team_members,
        handlers::team::add_team_member,
        handlers::team::remove_team_member,
        handlers::venue::list_venues,
        handlers::venue::get_venue,
        handlers::venue::create_venue,
        handlers::venue::update_venue,
        handlers::venue::delete_venue,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::event::create_event,
        handlers::event::update_event,
        handlers::event::delete_event,
        handlers::event::list_ticket_types,
        handlers::event::create_ticket_type,
        handlers::event::get_ticket_type,
        handlers::event::update_ticket_type,
        handlers::event::delete_ticket_type,
        handlers::people::list_speakers,
        handlers::people::get_speaker,
        handlers::people::create_speaker,
        handlers::people::update_speaker,
        handlers::people::delete_speaker,
        handlers::people::list_sponsors,
        handlers::people::get_sponsor,
        handlers::people::create_sponsor,
        handlers::people::update_sponsor,
        handlers::people::delete_sponsor,
        handlers::people::list_vendors,
        handlers::people::get_vendor,
        handlers::people::create_vendor,
        handlers::people::update_vendor,
        handlers::people::delete_vendor,
        handlers::page::list_pages,
        handlers::page::get_page,
        handlers::page::create_page,
        handlers::page::update_page,
        handlers::page::delete_page,
        handlers::feedback::list_surveys,
        handlers::feedback::get_survey,
        handlers::feedback::create_survey,
        handlers::feedback::update_survey,
        handlers::feedback::delete_survey,
        handlers::feedback::list_reviews,
        handlers::feedback::get_review,
        handlers::feedback::create_review,
        handlers::feedback::update_review,
        handlers::feedback::delete_review,
        handlers::promo_code::list_promo_codes,
        handlers::promo_code::get_promo_code,
        handlers::promo_code::create_promo_code,
        handlers::promo_code::update_promo_code,
        handlers::promo_code::delete_promo_code,
        handlers::promo_code::check_promo_code,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::place_order,
        handlers::order::update_order_status,
        handlers::activity_log::list_activity_logs,
        handlers::trash::list_trash,
        handlers::trash::trash_counts,
        handlers::trash::restore_item,
        handlers::trash::force_delete_item,
        handlers::trash::bulk_restore,
        handlers::trash::bulk_force_delete,
        handlers::trash::empty_trash,
        handlers::settings::get_mail_settings,
        handlers::settings::update_mail_settings,
        handlers::settings::send_test_mail,
        handlers::settings::list_backups,
        handlers::settings::create_backup,
        handlers::settings::delete_backup,
        handlers::settings::ask_assistant,
    ),
    components(
        schemas(
            ActivityLogResponse,
            AddTeamMemberRequest,
            ApiError,
            AssistantRequest,
            AssistantResponse,
            BackupFile,
            BulkTrashRequest,
            BulkTrashResult,
            CategoryRequest,
            CategoryResponse,
            CheckPromoCodeRequest,
            CheckPromoCodeResponse,
            EmptyTrashResponse,
            EventRequest,
            EventResponse,
            EventSortBy,
            SortDir,
            IdResponse,
            LinkSocialAccountRequest,
            LoginRequest,
            LoginResponse,
            MailSettingsRequest,
            MailSettingsResponse,
            OrderResponse,
            PageRequest,
            PageResponse,
            PasswordOtpRequest,
            PasswordResetRequest,
            PlaceOrderRequest,
            PromoCodeRequest,
            PromoCodeResponse,
            RefreshTokenRequest,
            ReviewRequest,
            ReviewResponse,
            SocialAccountResponse,
            SocialLoginRequest,
            SpeakerRequest,
            SpeakerResponse,
            SponsorRequest,
            SponsorResponse,
            SurveyRequest,
            SurveyResponse,
            TeamMemberResponse,
            TeamRequest,
            TeamResponse,
            TestMailRequest,
            TicketTypeRequest,
            TicketTypeResponse,
            TrashCount,
            TrashCountsResponse,
            TrashItemRef,
            TrashKind,
            TrashedItem,
            UpdateOrderStatusRequest,
            UserResponse,
            VendorRequest,
            VendorResponse,
            VenueRequest,
            VenueResponse,
            ApplicableTo,
            DiscountType,
            EventStatus,
            OrderStatus,
            SocialProvider,
            SponsorTier,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, tokens, password reset and social accounts"),
        (name = "categories", description = "Event categories"),
        (name = "teams", description = "Teams and their members"),
        (name = "venues", description = "Venues"),
        (name = "events", description = "Events and ticket types"),
        (name = "people", description = "Speakers, sponsors and vendors"),
        (name = "pages", description = "Content pages"),
        (name = "feedback", description = "Surveys and attendee reviews"),
        (name = "promo-codes", description = "Promo codes"),
        (name = "orders", description = "Ticket orders"),
        (name = "activity-logs", description = "Audit trail"),
        (name = "recycle-bin", description = "Soft-deleted records"),
        (name = "settings", description = "Mail settings, backups and the assistant"),
    ),
    info(
        title = "EventHub Admin API",
        version = "0.1.0",
        description = "REST API behind the EventHub administration dashboard"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/recycle-bin/{type}/{id}/restore"));
        assert!(paths.contains_key("/promo-codes/check"));
        assert!(paths.contains_key("/auth/login"));
        assert!(paths.contains_key("/surveys/{id}"));
        assert!(paths.contains_key("/reviews"));
    }
}
