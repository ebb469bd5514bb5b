//! Pagination utilities for service layer
//!
//! Page and limit come straight from query strings and are clamped, never
//! rejected.

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: i64,
    /// items per page
    pub limit: i64,
}

impl Pagination {
    /// Clamp to sane defaults and return `(limit, offset)`.
    /// - page < 1 becomes 1
    /// - limit outside 1..=100 becomes 20
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page < 1 { 1 } else { self.page as u64 };
        let limit = match u64::try_from(self.limit) {
            Ok(l) if (1..=MAX_LIMIT).contains(&l) => l,
            _ => DEFAULT_LIMIT,
        };
        let offset = (page - 1).saturating_mul(limit);
        (limit, offset)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, limit: DEFAULT_LIMIT as i64 } }
}
