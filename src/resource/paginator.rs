//! Page-by-page access to a collection.
//!
//! A backend hands the controller a [`Paginator`] over the whole result set;
//! the controller decides the page size and which page is current. The
//! current page is clamped into the valid range rather than rejected.

use super::ResourceItem;
use std::fmt;

/// Source of items for a [`Paginator`].
///
/// Implementations report the total number of items and return a slice on
/// demand, so a database-backed adapter only loads the current page.
pub trait PageAdapter: Send + Sync {
    /// Total number of items across all pages.
    fn count(&self) -> usize;

    /// Items starting at `offset`, at most `limit` of them.
    fn items(&self, offset: usize, limit: usize) -> Vec<ResourceItem>;
}

impl PageAdapter for Vec<ResourceItem> {
    fn count(&self) -> usize {
        self.len()
    }

    fn items(&self, offset: usize, limit: usize) -> Vec<ResourceItem> {
        self.iter().skip(offset).take(limit).cloned().collect()
    }
}

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Paginated view over a [`PageAdapter`].
pub struct Paginator {
    adapter: Box<dyn PageAdapter>,
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// Create a paginator positioned on the first page.
    pub fn new(adapter: impl PageAdapter + 'static) -> Self {
        Self {
            adapter: Box::new(adapter),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }

    /// Set the number of items per page.
    ///
    /// A size of zero is treated as one. The current page is re-clamped.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = self.clamp(self.current_page);
    }

    /// Select the current page, clamping into `[1, page_count]`.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = self.clamp(page);
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.page_count())
    }

    /// Total number of items.
    pub fn total_items(&self) -> usize {
        self.adapter.count()
    }

    /// Number of items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page number, 1-indexed.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages; never less than one.
    pub fn page_count(&self) -> usize {
        self.total_items().div_ceil(self.page_size).max(1)
    }

    /// Items on the current page.
    pub fn current_items(&self) -> Vec<ResourceItem> {
        let offset = (self.current_page - 1) * self.page_size;
        self.adapter.items(offset, self.page_size)
    }
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("total_items", &self.total_items())
            .field("page_size", &self.page_size)
            .field("current_page", &self.current_page)
            .finish()
    }
}
