//! Published controller state.

use crate::request::{page_count, PageRequest};
use crate::response::PageInfo;
use std::fmt::{self, Display};

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No fetch issued yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The latest real fetch failed.
    Errored,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Snapshot of everything a table view renders.
///
/// While `loading` is true the previous `rows` and `total_count` stay in place so
/// the table does not flash empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState<T> {
    pub request: PageRequest,
    /// Raw search box text, shown immediately; `request.search_term` is the applied one.
    pub search_input: String,
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page_info: Option<PageInfo>,
    pub loading: bool,
    pub phase: Phase,
    pub last_error: Option<String>,
    /// Sequence number of the most recently issued fetch.
    pub generation: u64,
}

impl<T> ControllerState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            request: PageRequest::new(page_size),
            search_input: String::new(),
            rows: Vec::new(),
            total_count: 0,
            page_info: None,
            loading: false,
            phase: Phase::Idle,
            last_error: None,
            generation: 0,
        }
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total_count, self.request.page_size)
    }

    /// Settled with nothing to show: the "no data" affordance.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.rows.is_empty()
    }
}
