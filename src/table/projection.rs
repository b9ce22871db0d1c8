//! Read-only view over the store: search filter plus one page of results.

use super::collation::name_matches;
use crate::models::Service;

/// Page sizes offered by the pagination footer.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [10, 25, 50];
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Current page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 0,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages needed for `count` rows. An empty result still has one
    /// (empty) page so page 0 is always valid.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.per_page.max(1)).max(1)
    }

    /// Pull the page index back into range after the filtered count shrank.
    pub fn clamp(&mut self, count: usize) {
        let last = self.page_count(count) - 1;
        if self.page > last {
            self.page = last;
        }
    }

    /// Change page size; the page index resets to the first page.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 0;
    }

    /// Advance to the next entry of `ROWS_PER_PAGE_OPTIONS`.
    pub fn cycle_per_page(&mut self) {
        let next = ROWS_PER_PAGE_OPTIONS
            .iter()
            .position(|&option| option == self.per_page)
            .map(|idx| ROWS_PER_PAGE_OPTIONS[(idx + 1) % ROWS_PER_PAGE_OPTIONS.len()])
            .unwrap_or(DEFAULT_ROWS_PER_PAGE);
        self.set_per_page(next);
    }

    /// Half-open row range of the current page within `count` rows.
    pub fn bounds(&self, count: usize) -> (usize, usize) {
        let per_page = self.per_page.max(1);
        let start = self.page.saturating_mul(per_page).min(count);
        let end = start.saturating_add(per_page).min(count);
        (start, end)
    }
}

/// The rows of one page plus the numbers the pagination footer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    pub rows: Vec<&'a Service>,
    /// Matches across all pages.
    pub filtered_count: usize,
    /// Index of the first row of this page within the filtered results.
    pub offset: usize,
    pub page: usize,
    pub page_count: usize,
}

impl Projection<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Records whose name contains `query` case-insensitively, in store order.
pub fn filter<'a>(records: &'a [Service], query: &str) -> Vec<&'a Service> {
    records
        .iter()
        .filter(|service| name_matches(&service.name, query))
        .collect()
}

/// Filter `records` and cut out the page described by `pagination`. A page
/// index past the end yields an empty page; callers clamp first.
pub fn project<'a>(records: &'a [Service], query: &str, pagination: Pagination) -> Projection<'a> {
    let filtered = filter(records, query);
    let filtered_count = filtered.len();
    let (start, end) = pagination.bounds(filtered_count);

    Projection {
        rows: filtered[start..end].to_vec(),
        filtered_count,
        offset: start,
        page: pagination.page,
        page_count: pagination.page_count(filtered_count),
    }
}
