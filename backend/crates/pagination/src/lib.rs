//! Offset pagination primitives shared by the logistics API.
//!
//! Callers hand over whatever `page` and `limit` values arrived on the wire
//! and receive a [`PageRequest`] that is always safe to turn into a SQL
//! `LIMIT`/`OFFSET` pair. [`PageMeta`] carries the figures clients need to
//! render page controls, and [`Paginated`] bundles one page of items with that
//! metadata.
//!
//! # Examples
//! ```
//! use pagination::{PageMeta, PageRequest};
//!
//! let request = PageRequest::normalised(Some(3), Some(10));
//! assert_eq!(request.offset(), 20);
//!
//! let meta = PageMeta::new(request, 25);
//! assert_eq!(meta.total_pages, 3);
//! ```

use serde::Serialize;

/// Page size applied when the caller omits `limit` or sends one out of range.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Normalised page selection.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= limit <= MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from raw, possibly missing or out-of-range inputs.
    ///
    /// A page below one becomes one. A limit outside `1..=MAX_PAGE_LIMIT`
    /// falls back to [`DEFAULT_PAGE_LIMIT`] rather than the nearest bound.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::normalised(Some(0), Some(101));
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), 10);
    /// ```
    #[must_use]
    pub fn normalised(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .map(|raw| raw.clamp(1, i64::from(u32::MAX)))
            .and_then(|raw| u32::try_from(raw).ok())
            .unwrap_or(1);
        let limit = limit
            .and_then(|raw| u32::try_from(raw).ok())
            .filter(|raw| (1..=MAX_PAGE_LIMIT).contains(raw))
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        Self { page, limit }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of items to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination figures returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of matching items across all pages.
    pub total: u64,
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// `ceil(total / limit)`; zero when there are no items.
    pub total_pages: u64,
}

impl PageMeta {
    /// Derive metadata for `request` given the total match count.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages: total.div_ceil(u64::from(request.limit())),
        }
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    /// Items on this page, in repository order.
    pub items: Vec<T>,
    /// Pagination figures for the whole result set.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Bundle `items` with metadata derived from `request` and `total`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }

    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
