pub mod activity_logs;
pub mod categories;
pub mod events;
pub mod mail_settings;
pub mod orders;
pub mod pages;
pub mod password_resets;
pub mod promo_code_categories;
pub mod promo_code_events;
pub mod promo_code_usages;
pub mod promo_codes;
pub mod reviews;
pub mod social_accounts;
pub mod soft_delete;
pub mod speakers;
pub mod sponsors;
pub mod surveys;
pub mod team_members;
pub mod teams;
pub mod ticket_types;
pub mod users;
pub mod vendors;
pub mod venues;

pub use activity_logs as activity_log_entity;
pub use categories as category_entity;
pub use events as event_entity;
pub use mail_settings as mail_settings_entity;
pub use orders as order_entity;
pub use pages as page_entity;
pub use password_resets as password_reset_entity;
pub use promo_code_categories as promo_code_category_entity;
pub use promo_code_events as promo_code_event_entity;
pub use promo_code_usages as promo_code_usage_entity;
pub use promo_codes as promo_code_entity;
pub use reviews as review_entity;
pub use social_accounts as social_account_entity;
pub use speakers as speaker_entity;
pub use sponsors as sponsor_entity;
pub use surveys as survey_entity;
pub use team_members as team_member_entity;
pub use teams as team_entity;
pub use ticket_types as ticket_type_entity;
pub use users as user_entity;
pub use vendors as vendor_entity;
pub use venues as venue_entity;

pub use events::EventStatus;
pub use orders::OrderStatus;
pub use promo_codes::{ApplicableTo, DiscountType};
pub use social_accounts::SocialProvider;
pub use soft_delete::SoftDelete;
pub use sponsors::SponsorTier;
