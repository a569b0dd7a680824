pub mod code_generator;
pub mod jwt;
pub mod password;
pub mod validation;

pub use code_generator::{generate_order_number, generate_six_digit_code};
pub use jwt::*;
pub use password::*;
pub use validation::*;
