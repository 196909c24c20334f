use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

/// Page selection applied to repository list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// Requested page (1-based).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Row offset for the requested page.
    pub fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// A single page of results together with paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Page that was returned (1-based).
    pub page: usize,
    /// Total number of pages available.
    pub total_pages: usize,
    /// Total number of matching items across all pages.
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total: usize, per_page: usize) -> Self {
        let total_pages = total.div_ceil(per_page.max(1));
        Self {
            items,
            page,
            total_pages,
            total,
        }
    }
}
