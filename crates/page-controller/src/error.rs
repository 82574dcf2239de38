//! # Controller Errors
//!
//! Two families of errors live here:
//!
//! - [`GridError`] is what a [`GridHandle`](crate::GridHandle) caller can see: the
//!   controller went away, or the intent itself was invalid.
//! - [`FetchError`] is what a [`DataSource`](crate::DataSource) reports. The controller
//!   never hands these to the view; it turns them into the `Errored` phase plus a
//!   notifier call.

use std::time::Duration;

/// Errors returned to callers of a [`GridHandle`](crate::GridHandle).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GridError {
    #[error("Controller closed")]
    ControllerClosed,
    #[error("Controller dropped response channel")]
    ControllerDropped,
    #[error("Page size {size} is not one of {allowed:?}")]
    InvalidPageSize { size: u32, allowed: Vec<u32> },
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Failure of a single data-source call.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FetchError {
    /// The request was superseded or the controller was disposed.
    #[error("Request cancelled")]
    Cancelled,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Cancellation is not a failure and must never reach the user.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
