//! Offset-based pagination types
//!
//! # Usage
//!
//! ```rust,ignore
//! // In an HTTP handler
//! let request = PaginationArgs { page: Some(0), size: Some(20) }.validate()?;
//!
//! // In a store
//! let page = Page::new(rows, request, total);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a caller can request; larger values are clamped.
pub const MAX_PAGE_SIZE: i64 = 200;

// ============================================================================
// Pagination Arguments
// ============================================================================

/// Raw pagination arguments as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationArgs {
    /// Zero-based page number.
    pub page: Option<i64>,
    /// Number of items per page.
    pub size: Option<i64>,
}

/// Why a set of pagination arguments was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must not be negative (got {0})")]
    NegativePage(i64),

    #[error("size must be at least 1 (got {0})")]
    SizeTooSmall(i64),
}

impl PaginationArgs {
    /// Validate and apply defaults.
    pub fn validate(&self) -> Result<PageRequest, PaginationError> {
        let page = self.page.unwrap_or(0);
        if page < 0 {
            return Err(PaginationError::NegativePage(page));
        }

        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size < 1 {
            return Err(PaginationError::SizeTooSmall(size));
        }

        Ok(PageRequest {
            page,
            size: size.min(MAX_PAGE_SIZE),
        })
    }
}

// ============================================================================
// PageRequest
// ============================================================================

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// Number of rows to skip (SQL `OFFSET`).
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// Number of rows to return (SQL `LIMIT`).
    pub fn limit(&self) -> i64 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of results plus the totals a client needs to navigate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let total_pages = if request.size > 0 {
            (total_elements + request.size - 1) / request.size
        } else {
            0
        };

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    /// Convert the items of the page, keeping the navigation totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
