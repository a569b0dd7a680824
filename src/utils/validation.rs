use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid regex")
    })
}

fn slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"))
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if email.len() > 255 || !email_regex().is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

/// Trims the value and rejects empty or over-long strings.
pub fn require_text(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

/// Empty strings become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lower-case, ASCII, hyphen-separated slug.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Uses the explicit slug when given (it must already be valid), otherwise derives one.
pub fn resolve_slug(explicit: Option<&str>, source: &str) -> AppResult<String> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(source),
    };
    if !slug_regex().is_match(&slug) {
        return Err(AppError::ValidationError("Invalid slug".to_string()));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@eventhub.io").is_ok());
        assert!(validate_email("first.last+tag@sub.example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust Conf 2025!"), "rust-conf-2025");
        assert_eq!(slugify("  --Hello   World-- "), "hello-world");
        assert_eq!(slugify("Café Night"), "caf-night");
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug(None, "Summer Gala").unwrap(), "summer-gala");
        assert_eq!(resolve_slug(Some("custom-one"), "ignored").unwrap(), "custom-one");
        assert!(resolve_slug(Some("Bad Slug"), "x").is_err());
        assert!(resolve_slug(None, "!!!").is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Main Hall ", 50).unwrap(), "Main Hall");
        assert!(require_text("name", "   ", 50).is_err());
        assert!(require_text("name", "abcdef", 5).is_err());
    }
}
