use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 128;

/// Admin passwords need 8 to 128 characters mixing lower case, upper case and digits.
/// The error names every rule the password misses.
pub fn validate_password(password: &str) -> AppResult<()> {
    let chars = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&chars) {
        return Err(AppError::ValidationError(format!(
            "Password must be {PASSWORD_MIN_CHARS} to {PASSWORD_MAX_CHARS} characters long"
        )));
    }

    let mut missing = Vec::new();
    if !password.chars().any(char::is_lowercase) {
        missing.push("a lower-case letter");
    }
    if !password.chars().any(char::is_uppercase) {
        missing.push("an upper-case letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit");
    }
    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Password needs {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| {
        log::error!("bcrypt hash failed: {}", e);
        AppError::InternalError("Could not store the password".into())
    })
}

/// `Ok(false)` on mismatch; an unreadable stored hash is an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    verify(password, stored_hash).map_err(|e| {
        log::error!("bcrypt verify failed: {}", e);
        AppError::InternalError("Could not check the password".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(password: &str) -> String {
        match validate_password(password) {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_strength_rules() {
        assert!(validate_password("Festival2025").is_ok());
        assert!(message("festival2025").contains("upper-case"));
        assert!(message("FESTIVAL2025").contains("lower-case"));
        assert!(message("Festival").contains("digit"));
        assert_eq!(
            message("festival"),
            "Password needs an upper-case letter, a digit"
        );
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(message("Ab1").contains("8 to 128"));
        // 8 characters, more than 8 bytes
        assert!(validate_password("Ünïcödé1").is_ok());
        let long = format!("Aa1{}", "x".repeat(PASSWORD_MAX_CHARS));
        assert!(validate_password(&long).is_err());
    }

    #[test]
    fn test_hash_round_trip_and_bad_hash() {
        let hashed = hash_password("Festival2025").unwrap();
        assert_ne!(hashed, "Festival2025");
        assert!(verify_password("Festival2025", &hashed).unwrap());
        assert!(!verify_password("Festival2026", &hashed).unwrap());
        assert!(matches!(
            verify_password("Festival2025", "not-a-bcrypt-hash"),
            Err(AppError::InternalError(_))
        ));
    }
}
