//! Toast notifications for failed list fetches.

use page_controller::ErrorNotifier;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

const MAX_TOASTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub page: &'static str,
    pub message: String,
}

/// Keeps the most recent toasts and logs each one.
///
/// Clones share the same log; [`ToastLog::scoped`] labels the toasts a given
/// list page raises.
#[derive(Debug, Clone)]
pub struct ToastLog {
    page: &'static str,
    toasts: Arc<Mutex<VecDeque<Toast>>>,
}

impl Default for ToastLog {
    fn default() -> Self {
        Self {
            page: "dashboard",
            toasts: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoped(&self, page: &'static str) -> Self {
        Self {
            page,
            toasts: Arc::clone(&self.toasts),
        }
    }

    /// Oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        let toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorNotifier for ToastLog {
    fn notify_error(&self, message: &str) {
        warn!(page = self.page, message, "Toast");
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        if toasts.len() == MAX_TOASTS {
            toasts.pop_front();
        }
        toasts.push_back(Toast {
            page: self.page,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_logs_share_storage() {
        let log = ToastLog::new();
        log.scoped("orders").notify_error("Server error 500: boom");
        log.scoped("users").notify_error("Transport error: offline");

        let toasts = log.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].page, "orders");
        assert_eq!(toasts[1].message, "Transport error: offline");
    }

    #[test]
    fn test_oldest_toast_is_dropped_when_full() {
        let log = ToastLog::new();
        for i in 0..MAX_TOASTS + 3 {
            log.notify_error(&format!("error {i}"));
        }
        let toasts = log.toasts();
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts[0].message, "error 3");
    }
}
