//! # Collaborator Contracts
//!
//! The controller talks to the outside world through two seams:
//!
//! - [`DataSource`]: the backend list endpoint. It receives a [`FetchRequest`] and
//!   a [`CancellationToken`] tied to that one call. When the token fires the source
//!   should abort its transport work and return [`FetchError::Cancelled`].
//! - [`ErrorNotifier`]: the toast layer. Fire and forget.
//!
//! The third seam, the default-filter provider, is [`FilterScope`](crate::FilterScope).

use crate::error::FetchError;
use crate::request::FetchRequest;
use crate::response::FetchResponse;
use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Backend list endpoint for rows of type `T`.
#[async_trait]
pub trait DataSource<T>: Send + Sync + 'static {
    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> Result<FetchResponse<T>, FetchError>;
}

/// Adapts an async closure into a [`DataSource`].
///
/// ```rust
/// use page_controller::{from_fn, CancellationToken, FetchError, FetchRequest, FetchResponse};
///
/// let source = from_fn(|request: FetchRequest, _cancel: CancellationToken| async move {
///     let rows: Vec<u32> = (0..request.page_size).collect();
///     Ok::<_, FetchError>(FetchResponse::new(rows, 100))
/// });
/// # let _ = source;
/// ```
pub struct FnSource<F> {
    f: F,
}

pub fn from_fn<F>(f: F) -> FnSource<F> {
    FnSource { f }
}

#[async_trait]
impl<T, F, Fut> DataSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(FetchRequest, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FetchResponse<T>, FetchError>> + Send + 'static,
{
    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> Result<FetchResponse<T>, FetchError> {
        (self.f)(request, cancel).await
    }
}

/// Surfaces fetch failures to the user.
pub trait ErrorNotifier: Send + Sync + 'static {
    fn notify_error(&self, message: &str);
}

/// Notifier that only writes an `error!` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ErrorNotifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        error!(message, "Fetch failed");
    }
}
