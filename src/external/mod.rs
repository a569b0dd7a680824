pub mod assistant;
pub mod mailer;

pub use assistant::*;
pub use mailer::*;
