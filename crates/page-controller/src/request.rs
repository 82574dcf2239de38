//! # Page Requests
//!
//! [`PageRequest`] is the controller's canonical view of what should be fetched next.
//! Page indices are 0-based everywhere inside the crate; the conversion to the
//! backend's 1-based `page_number` happens exactly once, in [`PageRequest::compose`].

use crate::config::ControllerConfig;
use crate::filter::{dedup_predicates, search_predicate, FilterPredicate, FilterScope};
use crate::sort::Sorting;
use serde::Serialize;

/// Highest page index whose 1-based page number still fits in a `u32`.
pub const MAX_PAGE_INDEX: u32 = u32::MAX - 1;

/// Page, sort, search and filter state owned by one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
    pub sorting: Option<Sorting>,
    /// Applied (trimmed) search term.
    pub search_term: String,
    pub filters: Vec<FilterPredicate>,
}

impl PageRequest {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
            sorting: None,
            search_term: String::new(),
            filters: Vec::new(),
        }
    }

    /// Row offset of the first row on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// True when this page starts at or beyond `total_count` rows.
    pub fn is_past_end(&self, total_count: u64) -> bool {
        total_count > 0 && self.offset() >= total_count
    }

    /// Builds the outbound request.
    ///
    /// Filters are the explicit ones plus the search-derived `iLike`, deduplicated,
    /// then handed to `scope` which appends the mandatory ones last.
    pub fn compose(&self, config: &ControllerConfig, scope: &dyn FilterScope) -> FetchRequest {
        let mut filters = self.filters.clone();
        filters.extend(search_predicate(&config.search_field, &self.search_term));
        let filters = scope.scope(dedup_predicates(filters));

        FetchRequest {
            page_number: self.page_index.saturating_add(1),
            page_size: self.page_size,
            filters,
            sorting: self.sorting.clone().or_else(|| config.default_sort.clone()),
        }
    }
}

/// What a [`DataSource`](crate::DataSource) receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    /// 1-based.
    pub page_number: u32,
    pub page_size: u32,
    pub filters: Vec<FilterPredicate>,
    pub sorting: Option<Sorting>,
}

impl FetchRequest {
    /// 0-based row offset, for sources that slice.
    pub fn offset(&self) -> usize {
        self.page_number.saturating_sub(1) as usize * self.page_size as usize
    }
}

/// Index of the last page that holds rows, or 0 when there are none.
pub fn last_page_index(total_count: u64, page_size: u32) -> u32 {
    if total_count == 0 || page_size == 0 {
        return 0;
    }
    let last = (total_count - 1) / u64::from(page_size);
    u32::try_from(last).unwrap_or(u32::MAX)
}

/// Number of pages needed for `total_count` rows.
pub fn page_count(total_count: u64, page_size: u32) -> u32 {
    if total_count == 0 || page_size == 0 {
        0
    } else {
        last_page_index(total_count, page_size).saturating_add(1)
    }
}
