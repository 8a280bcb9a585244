//! 1-based page/limit pair used by catalog search

use serde::Serialize;

/// Normalized pagination window
///
/// Out-of-range input never fails: a limit outside `1..=MAX_LIMIT` falls back
/// to `DEFAULT_LIMIT` and a page below 1 becomes page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l > 0 && l <= i64::from(Self::MAX_LIMIT) => l as u32,
            _ => Self::DEFAULT_LIMIT,
        };
        let page = match page {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        };
        Self { page, limit }
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for SQL `OFFSET`
    #[inline]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
