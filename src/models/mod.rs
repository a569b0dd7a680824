pub mod activity_log;
pub mod auth;
pub mod category;
pub mod common;
pub mod event;
pub mod feedback;
pub mod order;
pub mod page;
pub mod pagination;
pub mod people;
pub mod promo_code;
pub mod settings;
pub mod team;
pub mod trash;
pub mod venue;

pub use activity_log::*;
pub use auth::*;
pub use category::*;
pub use common::*;
pub use event::*;
pub use feedback::*;
pub use order::*;
pub use page::*;
pub use pagination::*;
pub use people::*;
pub use promo_code::*;
pub use settings::*;
pub use team::*;
pub use trash::*;
pub use venue::*;
