pub mod activity_log_service;
pub mod assistant_service;
pub mod auth_service;
pub mod backup_service;
pub mod category_service;
pub mod event_service;
pub mod mail_settings_service;
pub mod order_service;
pub mod page_service;
pub mod promo_code_service;
pub(crate) mod query;
pub mod review_service;
pub mod speaker_service;
pub mod sponsor_service;
pub mod survey_service;
pub mod team_service;
pub mod ticket_type_service;
pub mod trash_service;
pub mod vendor_service;
pub mod venue_service;

pub use activity_log_service::ActivityLogService;
pub use assistant_service::AssistantService;
pub use auth_service::AuthService;
pub use backup_service::BackupService;
pub use category_service::CategoryService;
pub use event_service::EventService;
pub use mail_settings_service::MailSettingsService;
pub use order_service::OrderService;
pub use page_service::PageService;
pub use promo_code_service::PromoCodeService;
pub use review_service::ReviewService;
pub use speaker_service::SpeakerService;
pub use sponsor_service::SponsorService;
pub use survey_service::SurveyService;
pub use team_service::TeamService;
pub use ticket_type_service::TicketTypeService;
pub use trash_service::TrashService;
pub use vendor_service::VendorService;
pub use venue_service::VenueService;
