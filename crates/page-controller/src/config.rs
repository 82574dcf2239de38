//! # Controller Configuration
//!
//! [`ControllerConfig`] is plain data with serde defaults, so callers can embed it in
//! whatever settings file they load. Every field is optional in the serialized form.

use crate::error::GridError;
use crate::sort::Sorting;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Tuning knobs for a single [`PageController`](crate::PageController).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Quiet period before a search keystroke turns into a fetch.
    pub debounce_ms: u64,
    /// Page sizes the view may offer.
    pub page_sizes: Vec<u32>,
    pub default_page_size: u32,
    /// Sort applied when the view has not picked one.
    pub default_sort: Option<Sorting>,
    /// Row field the search box matches with `iLike`.
    pub search_field: String,
    /// Optional transport timeout. `None` leaves a hung request loading.
    pub request_timeout_ms: Option<u64>,
    /// Issue the first fetch as soon as the controller starts.
    pub auto_fetch: bool,
    /// Capacity of the intent channel.
    pub channel_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            page_sizes: vec![10, 20, 50, 100],
            default_page_size: DEFAULT_PAGE_SIZE,
            default_sort: Some(Sorting::desc("createdAt")),
            search_field: "title".to_string(),
            request_timeout_ms: None,
            auto_fetch: true,
            channel_capacity: 32,
        }
    }
}

impl ControllerConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn is_allowed_page_size(&self, size: u32) -> bool {
        size > 0 && self.page_sizes.contains(&size)
    }

    /// Checks that `default_page_size` is positive and one of `page_sizes`.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.is_allowed_page_size(self.default_page_size) {
            Ok(())
        } else {
            Err(GridError::InvalidPageSize {
                size: self.default_page_size,
                allowed: self.page_sizes.clone(),
            })
        }
    }

    /// Page size a new controller starts with.
    ///
    /// An invalid default falls back to the first positive allowed size, then to 20.
    pub fn initial_page_size(&self) -> u32 {
        if self.is_allowed_page_size(self.default_page_size) {
            return self.default_page_size;
        }
        self.page_sizes
            .iter()
            .copied()
            .find(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = field.into();
        self
    }

    pub fn with_default_sort(mut self, sort: Option<Sorting>) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_auto_fetch(mut self, auto_fetch: bool) -> Self {
        self.auto_fetch = auto_fetch;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout_ms = timeout.map(|d| d.as_millis() as u64);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_or_unlisted_default_page_size_is_invalid() {
        let config = ControllerConfig::default().with_page_size(0);
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidPageSize { size: 0, .. })
        ));
        assert_eq!(config.initial_page_size(), 10);

        let config = ControllerConfig::default().with_page_size(33);
        assert!(config.validate().is_err());
        assert_eq!(config.initial_page_size(), 10);
    }

    #[test]
    fn test_no_usable_page_sizes_falls_back_to_twenty() {
        let config = ControllerConfig {
            page_sizes: vec![0],
            default_page_size: 0,
            ..ControllerConfig::default()
        };
        assert_eq!(config.initial_page_size(), 20);
    }
}
