use crate::error::{AppError, AppResult};
use actix_web::{HttpMessage, HttpRequest};

pub mod activity_log;
pub mod auth;
pub mod category;
pub mod event;
pub mod feedback;
pub mod order;
pub mod page;
pub mod people;
pub mod promo_code;
pub mod settings;
pub mod team;
pub mod trash;
pub mod venue;

pub use activity_log::activity_log_config;
pub use auth::auth_config;
pub use category::category_config;
pub use event::{event_config, ticket_type_config};
pub use feedback::{review_config, survey_config};
pub use order::order_config;
pub use page::page_config;
pub use people::{speaker_config, sponsor_config, vendor_config};
pub use promo_code::promo_code_config;
pub use settings::settings_config;
pub use team::team_config;
pub use trash::trash_config;
pub use venue::venue_config;

/// The user id put into the request extensions by `AuthMiddleware`.
pub(crate) fn current_user_id(req: &HttpRequest) -> AppResult<i64> {
    req.extensions()
        .get::<i64>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".into()))
}

/// Every route under `/api/v1`.
pub fn api_config(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(auth_config)
        .configure(category_config)
        .configure(team_config)
        .configure(venue_config)
        .configure(event_config)
        .configure(ticket_type_config)
        .configure(speaker_config)
        .configure(sponsor_config)
        .configure(vendor_config)
        .configure(page_config)
        .configure(survey_config)
        .configure(review_config)
        .configure(promo_code_config)
        .configure(order_config)
        .configure(activity_log_config)
        .configure(trash_config)
        .configure(settings_config);
}
