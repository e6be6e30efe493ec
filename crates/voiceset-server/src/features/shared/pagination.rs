//! Shared pagination utilities
//!
//! List queries take caller-supplied `offset`/`limit` parameters and return a
//! [`Page`] whose `has_more` flag is the usual approximation: a full page
//! means more results likely exist. No exact totals are computed.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_LIMIT: i64 = 20;

/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// Offset/limit request parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageParams {
    /// Number of items to skip. Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Maximum items to return. Defaults to 20, clamped to 1-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }

    /// Offset for the SQL OFFSET clause, never negative
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Limit for the SQL LIMIT clause, defaulted and clamped
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Validate raw parameters, returning a message on failure.
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err("Offset must not be negative");
            }
        }
        if let Some(limit) = self.limit {
            if !(1..=MAX_LIMIT).contains(&limit) {
                return Err("Limit must be between 1 and 100");
            }
        }
        Ok(())
    }
}

/// One slice of a list result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: i64,
    pub limit: i64,
    /// True when the slice is full, i.e. another page probably exists.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from fetched items and the params that produced them.
    pub fn new(items: Vec<T>, params: &PageParams) -> Self {
        let limit = params.limit();
        Self {
            has_more: items.len() as i64 == limit,
            offset: params.offset(),
            limit,
            items,
        }
    }

    /// Map items to a different type, keeping the slice metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = PageParams::default();
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_params_clamping() {
        let params = PageParams::new(Some(-5), Some(500));
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_params_validation() {
        assert!(PageParams::new(Some(10), Some(50)).validate().is_ok());
        assert_eq!(
            PageParams::new(Some(-1), None).validate(),
            Err("Offset must not be negative")
        );
        assert_eq!(
            PageParams::new(None, Some(0)).validate(),
            Err("Limit must be between 1 and 100")
        );
        assert_eq!(
            PageParams::new(None, Some(101)).validate(),
            Err("Limit must be between 1 and 100")
        );
    }

    #[test]
    fn test_full_page_signals_more() {
        let params = PageParams::new(Some(0), Some(3));
        let page = Page::new(vec![1, 2, 3], &params);
        assert!(page.has_more);

        let partial = Page::new(vec![1, 2], &params);
        assert!(!partial.has_more);
    }

    #[test]
    fn test_page_map() {
        let params = PageParams::new(Some(10), Some(2));
        let page = Page::new(vec![1, 2], &params).map(|x| x * 2);
        assert_eq!(page.items, vec![2, 4]);
        assert_eq!(page.offset, 10);
        assert!(page.has_more);
    }
}
