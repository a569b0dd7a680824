//! Pagination parameters and the paged response wrapper.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
/// Largest OFFSET the databases accept (a signed 64-bit value).
const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    pub page: u64,
    pub per_page: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    /// Page starts at 1, `per_page` is clamped to `1..=100`.
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Capped at the largest offset the database accepts.
    pub fn get_offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page).min(MAX_OFFSET)
    }

    pub fn get_limit(&self) -> u64 {
        self.per_page
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        let total_pages = total.div_ceil(params.per_page);
        Self {
            data,
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        }
    }
}

/// `search`, `page` and `per_page` as accepted by the plain list endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        search_term(self.search.as_deref())
    }
}

pub fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Escape character paired with [`like_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// `%term%` pattern for `LIKE ... ESCAPE '\'` filters. Wildcards typed by the
/// user match literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let p = PaginationParams::new(None, None);
        assert_eq!((p.page, p.per_page), (1, 20));

        let p = PaginationParams::new(Some(0), Some(1000));
        assert_eq!((p.page, p.per_page), (1, 100));

        let p = PaginationParams::new(Some(3), Some(0));
        assert_eq!(p.per_page, 1);
        assert_eq!(p.get_offset(), 2);
    }

    #[test]
    fn test_total_pages() {
        let params = PaginationParams::new(Some(1), Some(10));
        assert_eq!(PaginatedResponse::<i32>::new(vec![], params, 0).total_pages, 0);
        assert_eq!(PaginatedResponse::<i32>::new(vec![], params, 10).total_pages, 1);
        assert_eq!(PaginatedResponse::<i32>::new(vec![], params, 11).total_pages, 2);
    }

    #[test]
    fn test_search_term() {
        assert_eq!(search_term(Some("  gala ")), Some("gala".to_string()));
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(like_pattern("Gala"), "%gala%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("early_bird"), "%early\\_bird%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p = PaginationParams::new(Some(u64::MAX), Some(MAX_PER_PAGE));
        assert_eq!(p.get_offset(), i64::MAX as u64);

        let p = PaginationParams::new(Some(u64::MAX / 50), Some(MAX_PER_PAGE));
        assert_eq!(p.get_offset(), i64::MAX as u64);

        let p = PaginationParams::new(Some(2), Some(MAX_PER_PAGE));
        assert_eq!(p.get_offset(), 100);
    }
}
